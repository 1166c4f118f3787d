//! Binary for building WASM contracts from odra modules.
#![doc = "Binary for building WASM contracts from odra modules."]

#[allow(unused_imports)]
use yield_vault_contracts;

fn main() {
    // Compilation itself is driven by odra-build
}
