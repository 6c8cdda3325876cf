//! Controllers: the decision interface, scripted birds, evolved networks and the
//! population source used for training.

pub mod breeder;
pub mod controller;
pub mod network;

pub use breeder::{Breeder, ElitistBreeder};
pub use controller::{Controller, Observation, Scripted};
pub use network::{Activation, FeedForwardNetwork, Layer};
