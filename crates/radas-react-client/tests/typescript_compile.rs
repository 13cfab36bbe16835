use std::fs;
use std::path::Path;
use std::process::Command;

use radas_react_client::{GenApiConfig, generate_api};

const PACKAGE_JSON: &str = r#"{
  "name": "radas-compile-check",
  "private": true,
  "type": "module",
  "dependencies": {
    "@tanstack/react-query": "^5.0.0",
    "axios": "^1.6.0",
    "react": "^18.2.0",
    "zod": "^3.22.0",
    "zustand": "^4.5.0"
  },
  "devDependencies": {
    "@types/react": "^18.2.0",
    "typescript": "^5.4.0"
  }
}
"#;

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "ES2020",
    "module": "ESNext",
    "moduleResolution": "Bundler",
    "strict": true,
    "noEmit": true,
    "skipLibCheck": true
  },
  "include": ["src/**/*.ts"]
}
"#;

fn compile(fixture: &str) {
    let spec = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../radas-core/tests/fixtures")
        .join(fixture);
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    generate_api(&GenApiConfig::new(&spec, dir.join("src"))).unwrap();
    fs::write(dir.join("package.json"), PACKAGE_JSON).unwrap();
    fs::write(dir.join("tsconfig.json"), TSCONFIG).unwrap();

    let install = Command::new("npm")
        .args(["install", "--no-audit", "--no-fund"])
        .current_dir(dir)
        .output()
        .expect("failed to run npm install");
    if !install.status.success() {
        panic!(
            "npm install failed:\n{}",
            String::from_utf8_lossy(&install.stderr)
        );
    }

    let tsc = Command::new("npx")
        .args(["tsc", "--noEmit"])
        .current_dir(dir)
        .output()
        .expect("failed to run tsc");
    if !tsc.status.success() {
        panic!(
            "tsc failed for {fixture}:\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&tsc.stdout),
            String::from_utf8_lossy(&tsc.stderr),
        );
    }
}

#[test]
#[ignore = "requires node and network access"]
fn petstore_compiles() {
    compile("petstore-3.0.yaml");
}

#[test]
#[ignore = "requires node and network access"]
fn orders_compiles() {
    compile("orders-3.1.yaml");
}

#[test]
#[ignore = "requires node and network access"]
fn empty_compiles() {
    compile("empty.yaml");
}

#[test]
#[ignore = "requires node and network access"]
fn quirks_compiles() {
    compile("quirks-3.1.yaml");
}
