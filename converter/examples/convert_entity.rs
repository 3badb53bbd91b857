//! Builds a small item in code and prints it as Turtle and N-Triples.
//!
//! Run with: `cargo run --example convert_entity -p wikibase-rdf`

use wikibase_rdf::{
    Converter, ConverterConfig, Datatype, Entity, Format, MissingPropertyPolicy, PropertyShape,
    PropertyShapeRegistry, Quantity, Rank, Reference, Statement, Value, Vocabulary,
};

fn main() {
    let registry: PropertyShapeRegistry = [
        PropertyShape::new("P31", Datatype::WikibaseItem).with_label("en", "instance of"),
        PropertyShape::new("P1082", Datatype::Quantity).with_label("en", "population"),
        PropertyShape::new("P143", Datatype::WikibaseItem).with_label("en", "imported from"),
    ]
    .into_iter()
    .collect();
    let vocabulary = Vocabulary::wikidata();

    let entity = Entity::item("Q64")
        .with_label("en", "Berlin")
        .with_description("en", "capital of Germany")
        .with_statement(Statement::new("Q64-1", "P31", Value::EntityRef("Q515".into())))
        .with_statement(
            Statement::new(
                "Q64-2",
                "P1082",
                Value::Quantity(Quantity {
                    amount: "3677472".to_owned(),
                    unit: None,
                    upper_bound: None,
                    lower_bound: None,
                }),
            )
            .with_rank(Rank::Preferred)
            .with_reference(Reference::new("").with_snak("P143", Value::EntityRef("Q48183".into()))),
        );

    for format in [Format::Turtle, Format::NTriples] {
        let config = ConverterConfig::new(MissingPropertyPolicy::Fail).with_format(format);
        let converter = Converter::new(&registry, &vocabulary, config);
        match converter.convert_to_string(&entity) {
            Ok(document) => println!("# {format:?} ({} bytes)\n{document}", document.len()),
            Err(e) => eprintln!("conversion failed: {e}"),
        }
    }
}
