fn main() {
    uniffi::generate_scaffolding("src/bridge.udl").unwrap();
}
