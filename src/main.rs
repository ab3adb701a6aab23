use clap::Parser;
use form_designer::cli::commands::{
    CommandContext, cmd_add, cmd_create, cmd_list, cmd_move, cmd_palette, cmd_publish,
    cmd_remove, cmd_run, cmd_set, cmd_show, cmd_stats, cmd_submit,
};
use form_designer::cli::config::{Cli, Commands, load_config, log_filter};
use form_designer::element::registry;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref());

    // RUST_LOG > -v flags > config file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(&config, cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(dir) = cli.store_dir {
        config.store.dir = dir;
    }

    let ctx = CommandContext::new(config, registry::global(), cli.verbose);

    match cli.command {
        Commands::Create { name, description } => cmd_create(&ctx, &name, &description)?,
        Commands::List => cmd_list(&ctx)?,
        Commands::Palette => cmd_palette(&ctx)?,
        Commands::Show { form } => cmd_show(&ctx, form)?,
        Commands::Add {
            form,
            element_type,
            before,
            after,
        } => cmd_add(&ctx, form, &element_type, before.as_deref(), after.as_deref())?,
        Commands::Move {
            form,
            element,
            before,
            after,
        } => cmd_move(&ctx, form, &element, before.as_deref(), after.as_deref())?,
        Commands::Remove { form, element } => cmd_remove(&ctx, form, &element)?,
        Commands::Set {
            form,
            element,
            attrs,
        } => cmd_set(&ctx, form, &element, &attrs)?,
        Commands::Publish { form } => cmd_publish(&ctx, form)?,
        Commands::Submit { share_url, values } => cmd_submit(&ctx, &share_url, &values)?,
        Commands::Stats { form } => cmd_stats(&ctx, form)?,
        Commands::Run { script } => {
            let all_passed = cmd_run(&ctx, &script)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
