// src/backend/utils/log.rs

/// Writes to the IC debug console; falls back to stdout off-chain so the
/// service layer stays runnable in native unit tests.
#[cfg(target_arch = "wasm32")]
pub fn print(message: impl AsRef<str>) {
    ic_cdk::println!("{}", message.as_ref());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn print(message: impl AsRef<str>) {
    println!("{}", message.as_ref());
}
