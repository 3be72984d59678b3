pub mod export;
pub mod health;
pub mod items;
pub mod pipeline;
