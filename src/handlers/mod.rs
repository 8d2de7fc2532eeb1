pub mod answer;
pub mod article;
pub mod gallery;
pub mod quiz;
pub mod stats;
pub mod upload;
