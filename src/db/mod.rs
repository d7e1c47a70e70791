pub mod history;

pub use history::WearHistory;
