/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    let config = rune_config::TypesetConfig::load();

    println!("=== Rune Typeset Configuration ===\n");

    println!("Text Settings:");
    println!("  Synthesize small caps: {}", config.text.synthesize_small_caps);
    println!("  Synthesize subscript: {}", config.text.synthesize_subscript);
    println!("  Synthesize superscript: {}", config.text.synthesize_superscript);
    println!("  Default family: {:?}", config.text.default_family);
    println!("  Default size: {}", config.text.default_size);
    println!();

    println!("Layout Settings:");
    println!("  Area: {} x {}", config.layout.area_width, config.layout.area_height);
    println!("  Vertical alignment: {}", config.layout.vertical_alignment);
    println!("  Right-to-left: {}", config.layout.right_to_left);
    println!();

    println!("Families:");
    for family in &config.families {
        println!("  {} ({} faces)", family.name, family.faces.len());
    }
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
