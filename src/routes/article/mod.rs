mod handler;
mod model;

pub use handler::{create_article, delete_article, get_article, list_articles, update_article};
pub use model::{Article, CreateArticleRequest, NewArticle, UpdateArticleRequest};
