use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("easy-language")
        .version("1.0.0")
        .author("Easy Language contributors")
        .about("Extract and reinsert page-builder flow text")
        .arg(clap::arg!(<INPUT> "Document JSON file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format for extracted fragments (text, json)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["text", "json"]),
        )
        .arg(
            clap::arg!(--plugin <PLUGIN> "Active plugin (repeatable)")
                .value_name("PLUGIN")
                .action(clap::ArgAction::Append),
        )
        .arg(clap::arg!(--theme <NAME> "Active theme name"))
        .arg(clap::arg!(--"parent-theme" <NAME> "Parent of the active theme"))
        .arg(clap::arg!(--"site-url" <URL> "Site URL used for edit links"))
        .arg(
            clap::arg!(--"config-dir" <DIR> "Custom builder-config directory")
                .value_name("DIR")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--apply <FILE> "Replacement map to apply")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--offset <NUM> "Fragments to skip when applying").default_value("0"))
        .arg(clap::arg!(--limit <NUM> "Maximum number of fragments to apply"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "easy-language", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "easy-language", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "easy-language", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "easy-language", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
