//! End-to-end conversion tests
//!
//! Runs whole batches against both index implementations.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use crate::assets::{AssetIndex, FileAssetIndex, InMemoryAssetIndex, ResolutionEvent, TextureSlot};
    use crate::assets::materials::{MaterialResolver, ParsedMaterial, ResolveStatus, VmtParser};
    use crate::core::config::ConverterConfig;
    use crate::report::BoundedLog;
    use crate::BatchConverter;

    const BRICK_VMT: &str = r#""VertexLitGeneric"
{
    "$basetexture" "brick/diffuse.vtf"
    "$bumpmap" "brick/normal.vtf"
    "$surfaceprop" "brick"
}
"#;

    const BRICK_VMT_UNQUOTED: &str = r#"VertexLitGeneric
{
    $basetexture "brick/diffuse.vtf"
    $bumpmap "brick/normal.vtf"
}
"#;

    fn write(root: &Path, relative: &str, contents: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn brick() -> ParsedMaterial {
        ParsedMaterial::new("models/brick.vmt", "models/brick.vmt", VmtParser::parse(BRICK_VMT))
    }

    #[test]
    fn test_brick_material_in_memory() {
        let resolver = MaterialResolver::new(ConverterConfig::default());
        let mut index = InMemoryAssetIndex::new().with_shader("Standard");
        index.add_image("textures/diffuse.png");
        index.add_image("textures/normal.png");

        let resolution = resolver.resolve(&brick(), &mut index);

        assert_eq!(resolution.status, ResolveStatus::Created);
        let record = index.record("models/brick.mat").unwrap();
        assert_eq!(record.slot_texture(TextureSlot::Albedo), Some("textures/diffuse.png"));
        assert_eq!(record.slot_texture(TextureSlot::Normal), Some("textures/normal.png"));
        assert_eq!(record.slot_texture(TextureSlot::Metallic), None);

        let bound: Vec<_> = resolution
            .events
            .iter()
            .filter_map(|e| match e {
                ResolutionEvent::Bound { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(bound, vec![TextureSlot::Albedo, TextureSlot::Normal]);

        let mut log = BoundedLog::new(10_000);
        resolution.write_to(&mut log);
        assert!(log.text().contains("Assigned 'diffuse.png' to '_MainTex'."));
        assert!(log.text().contains("Assigned 'normal.png' to '_BumpMap'."));
    }

    #[test]
    fn test_second_run_updates_instead_of_duplicating() {
        let resolver = MaterialResolver::new(ConverterConfig::default());
        let mut index = InMemoryAssetIndex::new().with_shader("Standard");
        index.add_image("textures/diffuse.png");

        let first = resolver.resolve(&brick(), &mut index);
        let second = resolver.resolve(&brick(), &mut index);

        assert_eq!(first.status, ResolveStatus::Created);
        assert_eq!(second.status, ResolveStatus::Updated);
        assert_eq!(index.record_count(), 1);
        assert_eq!(first.resolved, second.resolved);
        assert_eq!(
            first.record.map(|r| r.textures),
            second.record.map(|r| r.textures)
        );
    }

    #[test]
    fn test_brick_folder_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "models/brick.vmt", BRICK_VMT.as_bytes());
        write(root, "textures/brick/diffuse.png", b"png");
        write(root, "textures/brick/normal.png", b"png");

        let config = ConverterConfig::default();
        let converter = BatchConverter::new(config.clone());

        let mut index = FileAssetIndex::scan(root, &config).unwrap();
        let mut log = BoundedLog::new(config.max_log_length);
        let summary = converter.run(root, &mut index, &mut log).unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.textures_bound, 2);
        assert_eq!(summary.textures_unresolved, 0);
        assert!(summary.is_success());

        let record = index.load_record("models/brick.mat").unwrap();
        assert_eq!(record.shader, "Standard");
        assert_eq!(record.slot_texture(TextureSlot::Albedo), Some("textures/brick/diffuse.png"));
        assert_eq!(record.slot_texture(TextureSlot::Normal), Some("textures/brick/normal.png"));
        assert_eq!(record.slot_texture(TextureSlot::Metallic), None);
        assert_eq!(log.lines().filter(|l| l.contains("Assigned")).count(), 2);

        // Rerun with a fresh index over the same tree
        let before = fs::read_to_string(root.join("models/brick.mat")).unwrap();
        let mut index = FileAssetIndex::scan(root, &config).unwrap();
        let mut log = BoundedLog::new(config.max_log_length);
        let summary = converter.run(root, &mut index, &mut log).unwrap();

        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.records_flushed, 1);
        assert_eq!(fs::read_to_string(root.join("models/brick.mat")).unwrap(), before);
        assert!(log.text().contains("Material file already exists."));
    }

    #[test]
    fn test_brick_with_unquoted_keys_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "models/brick.vmt", BRICK_VMT_UNQUOTED.as_bytes());
        write(root, "textures/diffuse.png", b"png");
        write(root, "textures/normal.png", b"png");

        let config = ConverterConfig::default();
        let mut index = FileAssetIndex::scan(root, &config).unwrap();
        let mut log = BoundedLog::new(config.max_log_length);
        let summary = BatchConverter::new(config).run(root, &mut index, &mut log).unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.textures_bound, 2);
        assert!(summary.is_success());

        let record = index.load_record("models/brick.mat").unwrap();
        assert_eq!(record.slot_texture(TextureSlot::Albedo), Some("textures/diffuse.png"));
        assert_eq!(record.slot_texture(TextureSlot::Normal), Some("textures/normal.png"));
        assert_eq!(record.slot_texture(TextureSlot::Metallic), None);
    }

    #[test]
    fn test_missing_shader_on_disk_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "props/crate.vmt", br#""$basetexture" "props/crate""#);

        let config = ConverterConfig::new().with_shaders(Vec::<String>::new()).with_default_shader("Standard");
        let mut index = FileAssetIndex::scan(root, &config).unwrap();
        let mut log = BoundedLog::new(config.max_log_length);

        // The file index always knows the configured default shader; ask for another one.
        let converter = BatchConverter::new(config.clone().with_default_shader("Missing/Shader"));
        let summary = converter.run(root, &mut index, &mut log).unwrap();

        assert_eq!(summary.shader_failures, 1);
        assert!(!summary.is_success());
        assert!(!root.join("props/crate.mat").exists());
        assert!(log.text().contains("Could not find the 'Missing/Shader' shader"));
    }
}
