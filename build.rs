use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backs `ntfy --version` and the plugin info reported to the host
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
