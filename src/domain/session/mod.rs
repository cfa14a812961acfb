//! Session snapshot and the membership gate derived from it

pub mod route;

pub use route::{decide_route, Actor, Route, SessionSnapshot};
