/// The flash arena: compiled code and data growing up, interned strings
/// and scratch buffers growing down.
pub mod flash;

/// The fixed-depth cell stacks: data, return, and user.
pub mod stacks;

/// The word dictionary: the static primitives table and the growable
/// colon-definition table.
pub mod dictionary;

/// The machine word used uniformly for stacks, compiled code, and data.
/// The width follows the target: 64 bit hosts get a 64 bit cell.
#[cfg(target_pointer_width = "64")]
pub type Cell = i64;

#[cfg(target_pointer_width = "64")]
pub type UCell = u64;

#[cfg(target_pointer_width = "32")]
pub type Cell = i32;

#[cfg(target_pointer_width = "32")]
pub type UCell = u32;

/// The cell width in bytes, reported by the CELLSIZE primitive.
pub const CELL_BYTES: usize = std::mem::size_of::<Cell>();
