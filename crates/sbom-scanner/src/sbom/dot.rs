//! 의존성 그래프 DOT 출력
//!
//! `DEPENDS_ON` 관계를 Graphviz `digraph`로 렌더링합니다. 노드 이름은
//! `name@version`이며 루트 패키지는 강조 표시됩니다.

use super::SbomInput;
use crate::types::RelationshipKind;

/// DOT 문자열 리터럴 이스케이프
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// 관계 그래프를 DOT 형식으로 렌더링합니다.
pub fn render(input: &SbomInput<'_>) -> String {
    let mut out = format!("digraph {} {{\n  rankdir=LR;\n  node [shape=box];\n", quote(input.name));

    for record in input.index.iter() {
        let key = record.key();
        let node = quote(&key.to_string());
        if input.root == Some(&key) {
            out.push_str(&format!("  {node} [style=filled, fillcolor=lightblue];\n"));
        } else {
            out.push_str(&format!("  {node};\n"));
        }
    }

    for edge in input
        .relationships
        .iter()
        .filter(|e| e.kind == RelationshipKind::DependsOn)
    {
        out.push_str(&format!(
            "  {} -> {};\n",
            quote(&edge.source.to_string()),
            quote(&edge.target.to_string())
        ));
    }

    out.push_str("}\n");
    out
}
