//! The `grid_index` macro, for the small newtypes that number parts of the
//! grid.

/// Declares `pub struct $name(i8)` holding an index in `0..$count`, along
/// with `COUNT`, `get`, `index`, `from_index` and `all`.  The tuple field stays
/// private to the declaring module, so only that module can build values
/// without a range check.
macro_rules! grid_index {
  ($(#[$attr:meta])* $name:ident[$count:literal]) => {
    $(#[$attr])*
    #[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
    pub struct $name(i8);

    impl $name {
      pub const COUNT: usize = $count;

      pub const fn get(self) -> i8 {
        self.0
      }

      pub const fn index(self) -> usize {
        self.0 as usize
      }

      /// The value numbered `index`, or None past the end.
      pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
          Some($name(index as i8))
        } else {
          None
        }
      }

      /// Every value in index order.
      pub fn all() -> impl Iterator<Item = Self> {
        (0..$count).map($name)
      }
    }
  };
}

pub(super) use grid_index;
