use lodestar_editor::{EditorRecord, RecordMapper, EMPTY_MARKER};
use lodestar_ini::{BiniBuilder, BiniReader, RawBlock, TextReader, TextWriter};
use lodestar_template::{SchemaCatalog, SchemaFile};

const TEMPLATE: &str = r#"<Template>
    <File name="Solar" paths="solar/*.ini">
        <Block name="Solar" multiple="true" identifier="nickname">
            <Option name="nickname"/>
            <Option name="solar_radius" kind="int"/>
            <Option name="pos" kind="point"/>
            <Option name="atmosphere_range" kind="int"/>
            <Option name="shape"/>
        </Block>
    </File>
    <File name="Market" paths="equipment/market_*.ini">
        <Block name="BaseGood" multiple="true" identifier="base">
            <Option name="base"/>
            <Option name="marketgood" multiple="true"/>
            <Option name="tag" multiple="true"/>
        </Block>
        <Block name="Nested" identifier="nickname">
            <Option name="nickname"/>
            <Option name="base" multiple="true"/>
            <Option name="loadout" parent="base" multiple="true"/>
        </Block>
    </File>
</Template>"#;

fn catalog() -> SchemaCatalog {
    SchemaCatalog::from_xml(TEMPLATE).expect("failed to load template")
}

fn map_with(schema: &SchemaFile, blocks: &[RawBlock]) -> Vec<EditorRecord> {
    RecordMapper::new(schema).map(blocks).expect("failed to map blocks")
}

fn map_text(file: &str, text: &str) -> Vec<EditorRecord> {
    let catalog = catalog();
    let schema = catalog.file(file).expect("missing schema file");
    map_with(schema, &TextReader::new().parse_str(text))
}

#[test]
fn solar_end_to_end() {
    let records = map_text("Solar", "[Solar]\nnickname = Li01\nsolar_radius = 456\n");

    assert_eq!(records.len(), 1);
    let solar = &records[0];
    let identifier = solar.identifier_option_index.expect("identifier not set");
    assert_eq!(solar.options[identifier].name, "nickname");
    assert_eq!(solar.options[identifier].values[0].value, "Li01");
    assert_eq!(solar.value("solar_radius").unwrap().value, "456");
    assert_eq!(solar.value("solar_radius").unwrap().as_i32(), Some(456));
}

#[test]
fn binary_and_text_values_match() {
    let text = "[Solar]\nnickname = Li01\nsolar_radius = 42\npos = 1.5, -2, 3\natmosphere_range = 5000\n";
    let raw = TextReader::new().parse_str(text);
    let bini = BiniBuilder::new().build(&raw).expect("failed to encode BINI");
    let decoded = BiniReader::parse(&bini).expect("failed to decode BINI");

    let catalog = catalog();
    let schema = catalog.file("Solar").unwrap();
    let from_text = map_with(schema, &raw);
    let from_bini = map_with(schema, &decoded);

    for name in ["nickname", "solar_radius", "atmosphere_range"] {
        assert_eq!(
            from_text[0].value(name).unwrap().value,
            from_bini[0].value(name).unwrap().value,
            "{name} differs"
        );
    }
    assert_eq!(from_bini[0].value("solar_radius").unwrap().value, "42");
    // Floats are normalized by the binary encoding but parse the same.
    assert_eq!(from_bini[0].value("pos").unwrap().value, "1.500000, -2, 3");
    assert_eq!(
        from_text[0].value("pos").unwrap().as_point(),
        from_bini[0].value("pos").unwrap().as_point()
    );
}

#[test]
fn empty_value_round_trip() {
    let text = "[Solar]\nnickname = Li01\nshape =\n";
    let records = map_text("Solar", text);

    let shape = records[0].value("shape").unwrap();
    assert_eq!(shape.value, EMPTY_MARKER);

    let written = TextWriter::to_string(&RecordMapper::unmap(&records));
    assert_eq!(written, text);
    assert!(!written.contains("= ="));
}

#[test]
fn schema_shape_is_complete() {
    let catalog = catalog();
    let schema = catalog.file("Solar").unwrap();
    let (block, _) = schema.find_block("Solar").unwrap();
    let all = ["nickname = Li01", "solar_radius = 1", "pos = 0, 0, 0", "atmosphere_range = 2", "shape = ring"];

    for missing in 0..=all.len() {
        let text = format!("[Solar]\n{}\n", all[missing..].join("\n"));
        let records = map_with(schema, &TextReader::new().parse_str(&text));
        assert_eq!(records[0].options.len(), block.options().len());
        let empty = records[0].options.iter().filter(|o| o.is_empty()).count();
        assert_eq!(empty, missing);
    }
}

#[test]
fn multiplicity() {
    let text = "[BaseGood]\nbase = Li01_01_Base\nmarketgood = a\nbase = Li01_02_Base\nmarketgood = b\nmarketgood = c\n";
    let records = map_text("Market", text);
    let record = &records[0];

    let goods: Vec<_> = record.option("marketgood").unwrap().values.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(goods, ["a", "b", "c"]);

    let base = record.option("base").unwrap();
    assert_eq!(base.values.len(), 1);
    assert_eq!(base.values[0].value, "Li01_02_Base");
    assert_eq!(record.display_name(), Some("Li01_02_Base"));
    assert!(record.option("tag").unwrap().is_empty());
}

#[test]
fn children_attach_to_preceding_parent() {
    // base at sequence 0 and 5, loadout at 1, 2 and 6.
    let text = "[Nested]\nbase = b0\nloadout = l1\nloadout = l2\nnickname = n\nnickname = n\nbase = b5\nloadout = l6\n";
    let blocks = TextReader::new().parse_str(text);
    let sequence: Vec<_> = blocks[0].options.get("loadout").map(|o| o.sequence_index).collect();
    assert_eq!(sequence, [1, 2, 6]);

    let catalog = catalog();
    let records = map_with(catalog.file("Market").unwrap(), &blocks);
    let base = records[0].option("base").unwrap();
    assert_eq!(base.child_name.as_deref(), Some("loadout"));
    assert_eq!(base.values.len(), 2);
    assert_eq!(base.values[0].value, "b0");
    assert_eq!(base.values[0].child_values, Some(vec!["l1".to_owned(), "l2".to_owned()]));
    assert_eq!(base.values[1].value, "b5");
    assert_eq!(base.values[1].child_values, Some(vec!["l6".to_owned()]));
    assert!(records[0].option("loadout").is_none());
}

#[test]
fn nested_round_trip_keeps_grouping() {
    let text = "[Nested]\nnickname = n\nbase = b0\nloadout = l1\nloadout = l2\nbase = b5\nloadout = l6\n";
    let records = map_text("Market", text);
    let written = TextWriter::to_string(&RecordMapper::unmap(&records));
    assert_eq!(written, text);

    let remapped = map_text("Market", &written);
    assert_eq!(remapped, records);
}
