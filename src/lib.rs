//! Vectors for tabular data whose elements may be missing.
//!
//! Two layouts are provided. A `DataVec<T>` keeps values densely in a `Vec<T>`
//! next to a bit-packed mask of missing positions. A `PooledVec<T, C>` stores
//! each element as a small unsigned code into a pool of distinct values, with
//! the code `0` reserved for missing; this suits columns where few distinct
//! values repeat often.
//!
//! Both present the same surface through the traits below: positional reads
//! that yield `Option<&T>`, positional writes that accept a value, `None`, or
//! the `NA` marker, bulk reads and writes through a `Selector`, and lazy
//! iteration under a choice of strategies for missing elements.
//!
//! ```
//! use datavec::{Index, IndexMut, PooledVec, NA};
//!
//! let mut column: PooledVec<&str> = PooledVec::from_values(&["b", "a", "b"]).unwrap();
//! assert_eq!(column.pool(), &["a", "b"]);
//! assert_eq!(column.codes(), &[2, 1, 2]);
//!
//! column.set(1, NA).unwrap();
//! assert_eq!(column.iter_skip_na().collect::<Vec<_>>(), vec![&"b", &"b"]);
//! ```

pub use common::{Clear, HeapSize, Index, IndexMut, Len, Push};
pub use cut::{cut, cut_groups};
pub use datavec::DataVec;
pub use error::{Error, Result};
pub use mask::Mask;
pub use na::NA;
pub use pooled::PooledVec;
pub use select::Selector;
pub use table::Table;
pub use value::{Code, PoolValue};

pub mod common;
pub mod encode;
pub mod iter;

mod cut;
mod datavec;
mod error;
mod mask;
mod na;
mod pooled;
mod select;
mod table;
mod value;
