pub mod resolver;
pub mod validate;


pub use resolver::{
    join_segment, sort_by_angle, truncate_to_join_point, turn_angle, JunctionGeometryResolver,
};
