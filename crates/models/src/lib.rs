pub mod errors;
pub mod db;
pub mod user;
pub mod category;
pub mod tag;
pub mod article;
pub mod article_tag;

#[cfg(test)]
mod tests;
