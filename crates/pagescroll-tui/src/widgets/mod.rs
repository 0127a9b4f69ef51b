mod item_list;
mod status_bar;

pub use item_list::ItemListWidget;
pub use status_bar::StatusBarWidget;
