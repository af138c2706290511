pub mod structure;

pub use structure::support_resistance::{
    find_resistance_levels, find_support_levels, global_resistance, global_support,
};
