//! Generates the Kotlin and Swift bindings for the host tag readers
//!
//! `uniffi_cli generate --language kotlin ...` for Android, anything else is
//! handed to the Swift generator for iOS

fn main() {
    let wants_kotlin = std::env::args()
        .skip(1)
        .any(|arg| arg.eq_ignore_ascii_case("kotlin") || arg.ends_with(".kt"));

    if wants_kotlin {
        uniffi::uniffi_bindgen_main();
    } else {
        uniffi::uniffi_bindgen_swift();
    }
}
