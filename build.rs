fn main() {
    // ESP-IDF link arguments are only relevant when building for the device.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
