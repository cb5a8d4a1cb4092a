pub mod academic;

pub mod ml;

pub mod user;
