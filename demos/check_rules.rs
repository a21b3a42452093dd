use drl::{Attribute, ItemContext, ItemType, LayerResolver, LayerTable, RuleModel};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/board.drl".to_owned());
    let layers = LayerTable::standard(4);

    let model = match RuleModel::from_file(&path, &layers) {
        Ok(model) => model,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    println!("{model}");
    for rule in model.rules() {
        println!("  {}", rule.name);
        for constraint in &rule.constraints {
            println!("    {constraint}");
        }
    }

    let Some(bottom) = layers.resolve("B.Cu") else {
        return;
    };
    let track = ItemContext::new()
        .with_layer(bottom)
        .set(Attribute::ItemType, ItemType::Track)
        .set(Attribute::NetClass, "HV");

    let names: Vec<&str> = model
        .applicable_rules(&track)
        .map(|rule| rule.name.as_str())
        .collect();
    println!("HV track on B.Cu: {}", names.join(", "));
}
