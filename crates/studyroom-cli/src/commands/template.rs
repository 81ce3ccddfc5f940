use clap::Subcommand;
use studyroom_core::{Action, SequenceTemplate, ValidationError};

use crate::common::{print_json, AppContext};

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Save the current sequence as a named template
    Save { name: String },
    /// Install a template as the current sequence (fresh progress)
    Load { id: String },
    /// Delete a template
    Delete { id: String },
    /// List templates
    List,
}

pub async fn run(action: TemplateAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        TemplateAction::Save { name } => {
            let items = ctx
                .state()
                .sequence
                .as_ref()
                .ok_or(ValidationError::Missing("current sequence"))?
                .sequence
                .clone();
            let template = SequenceTemplate::new(name, items);
            let id = template.id.clone();
            ctx.dispatch(Action::SaveTemplate { template });
            print_json(
                ctx.state()
                    .templates
                    .iter()
                    .find(|t| t.id == id)
                    .expect("just saved"),
            )?;
        }
        TemplateAction::Load { id } => {
            if !ctx.state().templates.iter().any(|t| t.id == id) {
                return Err(Box::new(ValidationError::NotFound {
                    entity: "template",
                    id,
                }));
            }
            ctx.dispatch(Action::LoadTemplate { id });
            print_json(&ctx.state().sequence)?;
        }
        TemplateAction::Delete { id } => {
            ctx.dispatch(Action::DeleteTemplate { id: id.clone() });
            println!("{{\"deleted\": \"{id}\"}}");
        }
        TemplateAction::List => {
            print_json(&ctx.state().templates)?;
        }
    }

    ctx.finish().await
}
