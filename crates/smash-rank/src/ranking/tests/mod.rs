mod common;
mod shaping;
