use shadow_rs::ShadowBuilder;

fn main() {
    // version and git metadata for `--version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
