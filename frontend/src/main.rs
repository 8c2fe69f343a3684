//! Entry point for the WASM application

pub fn main() {
    dropsend_frontend::start();
}
