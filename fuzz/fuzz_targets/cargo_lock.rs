#![no_main]

use libfuzzer_sys::fuzz_target;
use rustbom_sbom_scanner::parser::LockfileParser;
use rustbom_sbom_scanner::parser::cargo::CargoLockParser;
use rustbom_sbom_scanner::reconcile::reconcile;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let parser = CargoLockParser;
        if let Ok(decls) = parser.parse(content, "fuzz/Cargo.lock") {
            // 파싱에 성공한 입력은 조정 단계에서 패닉하지 않아야 한다
            let root = decls.first().map(|d| d.name.clone());
            let _ = reconcile(&decls, root.as_deref());
        }
    }
});
