// A build script is required for cargo to consider build flags.
fn main() {}
