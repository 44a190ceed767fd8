mod catalog;
mod common;
mod members;
mod reservations;
