//! Marker types describing what a [`DateTimeOf`] stands for.
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing the last modification of an entity.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Marker type describing a deadline after which an entity expires.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing a completion of some process.
#[derive(Clone, Copy, Debug)]
pub struct Completion;
