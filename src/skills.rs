//! Independent capabilities the dispatcher routes messages to.

mod caption;
mod disease;
mod news;
mod snippets;
mod story;
mod summarize;
mod symbolic;
mod wikipedia;

pub use caption::Captioner;
pub use disease::disease_info;
pub use news::NewsClient;
pub use snippets::SnippetTable;
pub use story::{STORY_HINTS, generate_story};
pub use summarize::summarize;
pub use symbolic::solve_symbolic;
pub use wikipedia::WikipediaClient;
