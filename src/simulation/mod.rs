pub mod states;
pub mod periodic_box;
pub mod cell_list;
pub mod scenario;
