pub mod article;
pub mod page;
pub mod load_state;

pub use article::{Article, Source};
pub use page::{Page, PageRequest, PageResult};
pub use load_state::{Direction, LoadState, LoadStates, Phase};
