//! Core entity and transform functionality

pub mod entity;
