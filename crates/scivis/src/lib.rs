#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use scivis_linalg as linalg;

#[doc(inline)]
pub use scivis_locator as locator;
