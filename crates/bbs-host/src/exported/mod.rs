//! Host function families exported to emulated modules, one submodule per
//! import library.

pub mod galsbl;
