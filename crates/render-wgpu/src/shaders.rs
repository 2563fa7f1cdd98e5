/// Built-in vertex stage, used when the configured file is missing or invalid.
pub const VERTEX_SHADER: &str = include_str!("../../../assets/shaders/vertex.wgsl");

/// Built-in fragment stage, used when the configured file is missing or invalid.
pub const FRAGMENT_SHADER: &str = include_str!("../../../assets/shaders/fragment.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_stages_declare_their_entry_points() {
        assert!(VERTEX_SHADER.contains(&format!("fn {VERTEX_ENTRY}(")));
        assert!(FRAGMENT_SHADER.contains(&format!("fn {FRAGMENT_ENTRY}(")));
    }

    #[test]
    fn stages_share_the_uniform_block() {
        let block = |src: &str| {
            let start = src.find("struct Uniforms").unwrap();
            let end = start + src[start..].find("};").unwrap();
            src[start..end].to_string()
        };
        assert_eq!(block(VERTEX_SHADER), block(FRAGMENT_SHADER));
    }
}
