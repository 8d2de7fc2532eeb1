pub mod answer;
pub mod article;
pub mod gallery;
pub mod question;
pub mod quiz;

pub use answer::Answer;
pub use article::{Article, ArticleStatus};
pub use gallery::GalleryPhoto;
pub use question::Question;
pub use quiz::Quiz;
