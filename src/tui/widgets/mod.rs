pub mod add_bar;
pub mod color;
pub mod dialog;
pub mod editor;
pub mod help;
pub mod plant_list;
pub mod plant_view;
pub mod status_bar;
