use std::{fs, process, sync::Arc};

use myblog::{
    application::{
        clock::SystemClock,
        error::AppError,
        form::CreatePostForm,
        repos::KeyValueStore,
        share,
        store::{HOME_FEATURED_LIMIT, PostStore},
        theme::ThemeSettings,
        view::ViewState,
    },
    config::{self, Command, CreateArgs, ListArgs, OutputFormat, Settings, ThemeArgs},
    domain::{error::DomainError, types::Page},
    infra::{error::InfraError, storage::FileStore, telemetry},
    presentation::{
        output,
        views::{
            CategoryListView, NotFoundView, PostDetailView, PostListView, ShareLinkView, ThemeView,
        },
    },
};
use tracing::{Dispatch, Level, debug, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use url::Url;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(
            error = %error,
            chain = ?report.messages,
            summary = error.presentation_message(),
            "application error"
        );
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(
            error = %error,
            summary = error.presentation_message(),
            "application error"
        );
    });
}

/// Collaborators shared by every command.
struct Context {
    settings: Settings,
    storage: Arc<dyn KeyValueStore>,
    output: OutputFormat,
}

impl Context {
    fn post_store(&self) -> PostStore {
        PostStore::load(
            self.storage.clone(),
            Arc::new(SystemClock),
            self.settings.post_defaults(),
        )
    }
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?;

    telemetry::init(&settings.logging)?;

    let storage = FileStore::open(&settings.storage.path)?;
    debug!(path = %storage.path().display(), "using data file");

    let ctx = Context {
        settings,
        storage: Arc::new(storage),
        output: cli_args.output,
    };

    match cli_args.command.unwrap_or(Command::Home) {
        Command::Home => run_home(&ctx),
        Command::List(args) => run_list(&ctx, args),
        Command::Show(args) => run_show(&ctx, &args.id),
        Command::Create(args) => run_create(&ctx, *args),
        Command::Share(args) => run_share(&ctx, &args.id),
        Command::Open(args) => run_open(&ctx, &args.url),
        Command::Theme(args) => run_theme(&ctx, args),
        Command::Categories => output::print(ctx.output, &CategoryListView::known()),
    }
}

fn run_home(ctx: &Context) -> Result<(), AppError> {
    let store = ctx.post_store();
    let mut view = ViewState::new();
    view.navigate(Page::Home, None);

    output::print(ctx.output, &PostListView::home(store.latest(HOME_FEATURED_LIMIT)))
}

fn run_list(ctx: &Context, args: ListArgs) -> Result<(), AppError> {
    let store = ctx.post_store();
    let mut view = ViewState::new();
    view.navigate(Page::Blog, None);
    view.set_search(args.search);
    view.set_category(args.category);

    let visible = view.visible_posts(&store);
    output::print(ctx.output, &PostListView::archive(&view, &visible))
}

fn run_show(ctx: &Context, id: &str) -> Result<(), AppError> {
    let store = ctx.post_store();
    let mut view = ViewState::new();
    view.open_post(id);

    match view.selected_post(&store) {
        Some(post) => output::print(ctx.output, &PostDetailView::new(post, false)),
        None => not_found(ctx, view.selected_post_id()),
    }
}

fn run_create(ctx: &Context, args: CreateArgs) -> Result<(), AppError> {
    let CreateArgs {
        title,
        excerpt,
        content,
        content_file,
        category,
        author,
        image,
        image_url,
    } = args;

    let content = match content_file {
        Some(path) => fs::read_to_string(&path).map_err(InfraError::from)?,
        None => content.unwrap_or_default(),
    };

    let mut form = CreatePostForm::default();
    form.title = title.unwrap_or_default();
    form.excerpt = excerpt.unwrap_or_default();
    form.content = content;
    form.category = category;
    form.author = author;
    if let Some(path) = image.as_deref() {
        form.attach_image_file(path)?;
    } else if let Some(url) = image_url.as_deref() {
        form.set_image_url(url)?;
    }

    let draft = form.submit()?;
    let mut store = ctx.post_store();
    let post = store.create(draft)?;
    info!(post_id = %post.id, "post saved");

    output::print(ctx.output, &PostDetailView::new(&post, false))
}

fn run_share(ctx: &Context, id: &str) -> Result<(), AppError> {
    let store = ctx.post_store();
    let Some(post) = store.find(id) else {
        return Err(DomainError::not_found("post").into());
    };

    let url = share::share_url(&ctx.settings.site.base_url, post);
    output::print(
        ctx.output,
        &ShareLinkView {
            id: post.id.clone(),
            url: url.into(),
        },
    )
}

fn run_open(ctx: &Context, url: &Url) -> Result<(), AppError> {
    let store = ctx.post_store();
    let mut view = ViewState::new();
    if !view.open_location(url) {
        return Err(DomainError::validation(format!(
            "link has no `{}` parameter",
            share::SHARE_PARAM
        ))
        .into());
    }

    match view.selected_post(&store) {
        Some(post) => output::print(ctx.output, &PostDetailView::new(post, true)),
        None => not_found(ctx, None),
    }
}

fn run_theme(ctx: &Context, args: ThemeArgs) -> Result<(), AppError> {
    let mut theme = ThemeSettings::load(ctx.storage.clone());
    if args.toggle {
        theme.toggle()?;
    }
    output::print(ctx.output, &ThemeView::from(theme.theme()))
}

/// The detail page's empty state: printed like any other view.
fn not_found(ctx: &Context, requested_id: Option<&str>) -> Result<(), AppError> {
    info!(requested_id, "post not found");
    output::print(ctx.output, &NotFoundView::new(requested_id))
}
