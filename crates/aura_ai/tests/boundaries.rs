use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(p) = stack.pop() {
        let entries = match fs::read_dir(&p) {
            Ok(e) => e,
            Err(_) => continue,
        };
        for ent in entries.flatten() {
            let path = ent.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

#[test]
fn scoring_math_lives_only_in_aura_core() {
    // Guardrail: capability adapters must reuse the core similarity/aggregation functions
    // instead of carrying their own copies.
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    let files = collect_rs_files(&src_root);
    assert!(!files.is_empty());

    for f in files {
        let text = fs::read_to_string(&f).unwrap_or_default();
        for forbidden in ["fn cosine_similarity", "fn aggregate", "fn select_evidence", "fn segment("] {
            assert!(
                !text.contains(forbidden),
                "`{forbidden}` found in {}",
                f.display()
            );
        }
    }
}

#[test]
fn aura_core_stays_network_free() {
    let core_src = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../aura_core/src");
    let files = collect_rs_files(&core_src);
    assert!(!files.is_empty());

    for f in files {
        let text = fs::read_to_string(&f).unwrap_or_default();
        for forbidden in ["ureq::", "scraper::", "std::net::"] {
            assert!(
                !text.contains(forbidden),
                "network dependency `{forbidden}` found in {}",
                f.display()
            );
        }
    }
}
