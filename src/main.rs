use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use relay_translator::chain::{ChainOptions, TraceWriter, TranslationChain};
use relay_translator::client::OpenRouterClient;
use relay_translator::config::{
    find_default_config, init_default_config, load_config, resolve_config, AppConfig,
    AVAILABLE_STT_MODELS, AVAILABLE_TRANSLATION_MODELS,
};
use relay_translator::detect::{resolve_source, resolve_target};
use relay_translator::format::format_result;
use relay_translator::ir::TranslationRequest;
use relay_translator::lang::LanguageTag;
use relay_translator::progress::ConsoleProgress;
use relay_translator::storage::UserStorage;
use relay_translator::stt::{transcribe_voice, VoiceFile};
use relay_translator::tts::synthesize;

#[derive(Parser, Debug)]
#[command(name = "relay-translator")]
#[command(about = "ru<->th translation relay (OpenRouter chain with artifact cleanup)", long_about = None)]
struct Args {
    /// Text to translate
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Voice file to transcribe first (consumed: deleted after use)
    #[arg(long, value_name = "AUDIO")]
    voice: Option<PathBuf>,

    /// User id for settings lookup
    #[arg(long, default_value_t = 0)]
    user: i64,

    /// Override the user's native language (ru/th/en)
    #[arg(long, value_name = "LANG")]
    native_lang: Option<String>,

    /// Override the translation model for this run
    #[arg(long)]
    model: Option<String>,

    /// Show the control (round-trip) line in the output
    #[arg(long)]
    show_control: bool,

    /// Skip the control hop entirely
    #[arg(long)]
    no_control: bool,

    /// Synthesize the final translation to a WAV file and print its path
    #[arg(long)]
    speak: bool,

    /// List the selectable translation/STT models, then exit
    #[arg(long)]
    list_models: bool,

    /// Config file path (default: search for relay-translator.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generate a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Overwrite an existing config with --init-config
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(true);

    if args.init_config {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", path.display());
        return Ok(());
    }

    if args.list_models {
        println!("Translation models:");
        for m in AVAILABLE_TRANSLATION_MODELS {
            println!("  {m}");
        }
        println!("STT models:");
        for m in AVAILABLE_STT_MODELS {
            println!("  {m}");
        }
        return Ok(());
    }

    let cfg = match args
        .config
        .clone()
        .or_else(|| find_default_config(&std::env::current_dir().unwrap_or_default()))
    {
        Some(path) => load_config(&path)?,
        None => AppConfig::default(),
    };
    let cfg = resolve_config(&cfg)?;

    let mut storage = UserStorage::open(&cfg.users_file);
    let mut profile = storage.get(args.user)?;
    if let Some(code) = args.native_lang.as_deref() {
        let lang = LanguageTag::from_code(code)?;
        profile = storage.set_native_language(args.user, lang)?;
    }

    let client = OpenRouterClient::new(cfg.api_key.clone(), cfg.base_url.clone());

    let text = match (&args.text, &args.voice) {
        (Some(t), _) => t.clone(),
        (None, Some(path)) => {
            let voice = VoiceFile::new(path);
            transcribe_voice(&client, &profile.stt_model, voice, &progress)
                .context("speech recognition failed")?
        }
        (None, None) => {
            anyhow::bail!("nothing to translate: pass TEXT or --voice <AUDIO>");
        }
    };

    let source = resolve_source(&text, profile.native_language);
    let target = resolve_target(source, profile.native_language);
    if source == target {
        progress.info(format!("source == target ({source}); nothing to do"));
        return Ok(());
    }

    let model = args
        .model
        .clone()
        .unwrap_or_else(|| profile.translation_model.clone());
    let request = TranslationRequest::new(text, source, target, model);

    let trace = TraceWriter::new(cfg.trace_dir.clone(), cfg.trace_enabled)
        .unwrap_or_else(|_| TraceWriter::disabled());
    let chain = TranslationChain::new(&client, progress)
        .with_trace(trace)
        .with_options(ChainOptions {
            skip_control: args.no_control,
        });

    let result = chain.run(&request);
    if let Some(err) = result.error.as_deref() {
        eprintln!("\u{274C} {err}");
        std::process::exit(1);
    }

    println!("{}", format_result(&result, args.show_control));

    if args.speak {
        let progress = ConsoleProgress::new(true);
        if let Some(final_text) = result.final_translation.as_deref() {
            match synthesize(final_text, result.target_lang, &progress) {
                Some(path) => println!("audio: {}", path.display()),
                None => eprintln!("\u{274C} speech synthesis unavailable"),
            }
        }
    }

    Ok(())
}
