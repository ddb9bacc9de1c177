fn main() {
    println!("cargo:rerun-if-env-changed=ALERTNODE_CONFIG_JSON");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
