//! Form command - show the connection settings form

use anyhow::Result;
use paypal_adapter::prelude::*;

use crate::ui;

pub fn run(json: bool) -> Result<()> {
    let factory = PaypalConnection::new();
    let mut builder = Builder::new();
    factory.configure(&mut builder, &DefaultElementFactory);
    let form = builder.into_form();

    if json {
        ui::json(&serde_json::to_value(&form)?);
        return Ok(());
    }

    ui::header(&format!("{} connection settings", factory.name()));
    for element in form.elements() {
        match element {
            Element::Select(select) => {
                let options: Vec<&str> = select.options.iter().map(|o| o.key.as_str()).collect();
                ui::key_value(&select.name, &format!("{} [{}]", select.title, options.join("|")));
            }
            Element::Input(input) => {
                ui::key_value(&input.name, &format!("{} ({})", input.title, input.input_type));
            }
        }
    }

    Ok(())
}
