use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use stagehand::{
    DisplaySurface,
    Act, CONFIG_FILE, Controller, ControllerFactory, Dependencies, DirResources, DirectorConfig,
    DirectorHandle, DirectorState, EmbeddedResources, Fade, Immediate, Properties, SceneDirector,
    StaticViews, Transition, TransitionPolicy, WindowSurface, injectable,
};

type View = &'static str;
type Director = SceneDirector<WindowSurface<View>, StaticViews<View>>;

/// Two-scene demo: Enter opens settings, Escape goes back (or quits from home).
#[derive(Parser, Clone, Debug)]
#[command(version, about)]
struct Args {
    /// Window title
    #[arg(long, default_value = "Stagehand")]
    title: String,

    /// Directory holding per-controller config.properties files
    #[arg(long)]
    config_root: Option<PathBuf>,

    /// Transition used when switching scenes
    #[arg(long, value_enum, default_value_t = TransitionArg::Fade)]
    transition: TransitionArg,

    /// Transition duration in seconds
    #[arg(long, default_value_t = 0.5)]
    duration: f32,

    /// What to do when a switch is requested during a transition
    #[arg(long, value_enum, default_value_t = PolicyArg::Supersede)]
    policy: PolicyArg,

    /// Process property, may be repeated
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    define: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TransitionArg {
    Instant,
    Fade,
    Crossfade,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Supersede,
    Reject,
    Overlap,
}

impl From<PolicyArg> for TransitionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Supersede => TransitionPolicy::Supersede,
            PolicyArg::Reject => TransitionPolicy::Reject,
            PolicyArg::Overlap => TransitionPolicy::Overlap,
        }
    }
}

#[derive(Default)]
struct HomeScreen {
    greeting: String,
    api_url: String,
}

injectable!(HomeScreen {
    greeting: String,
    api_url: String => "apiUrl",
});

impl Controller<View> for HomeScreen {}

#[derive(Default)]
struct SettingsScreen {
    theme: String,
    back: Option<DirectorHandle<View>>,
}

injectable!(SettingsScreen { theme: String });

impl Controller<View> for SettingsScreen {
    fn act(&mut self) -> Option<&mut dyn Act<View>> {
        Some(self)
    }
}

impl Act<View> for SettingsScreen {
    fn prepare(&mut self, director: DirectorHandle<View>, _root: &View) {
        self.back = Some(director);
    }
}

/// Built-in defaults used when no `--config-root` is given.
fn embedded_config() -> EmbeddedResources {
    EmbeddedResources::new()
        .with(module_path!(), CONFIG_FILE, "greeting=Welcome home\ntheme=dark\n")
}

fn build_director(window: Arc<Window>, args: &Args, properties: Properties) -> anyhow::Result<Director> {
    let dependencies = Dependencies::new()
        .properties(properties)
        .instantiator(|name| match name {
            "apiUrl" => Some("http://localhost:8080".into()),
            _ => None,
        });
    let mut factory = match &args.config_root {
        Some(root) => ControllerFactory::with_dependencies(dependencies, DirResources::new(root)),
        None => ControllerFactory::with_dependencies(dependencies, embedded_config()),
    };
    factory
        .register::<HomeScreen>("HomeScreen")
        .register::<SettingsScreen>("SettingsScreen");

    let views = StaticViews::new()
        .view("home.view", "HomeScreen", || "Home (Enter: settings, Escape: quit)")
        .view("settings.view", "SettingsScreen", || "Settings (Escape: back)");

    let config = DirectorConfig::new()
        .title(args.title.clone())
        .transition_policy(args.policy.into());
    let mut director =
        SceneDirector::with_factory(WindowSurface::new(window), views, factory, config);

    director.prepare("home", "home.view")?;
    director.prepare("settings", "settings.view")?;
    if let Some(home) = director.controller::<HomeScreen>("home") {
        info!(greeting = %home.greeting, api_url = %home.api_url, "home prepared");
    }
    if let Some(settings) = director.controller::<SettingsScreen>("settings") {
        info!(theme = %settings.theme, "settings prepared");
    }

    director.show("home")?;
    director.reveal();
    Ok(director)
}

enum DemoApp {
    Pending {
        args: Args,
        properties: Properties,
    },
    Running {
        director: Director,
        args: Args,
        fade: Option<Rc<RefCell<Fade>>>,
        title: String,
        start_time: Instant,
    },
}

impl DemoApp {
    /// Build the configured transition, keeping a handle to fades for the title bar.
    fn transition(args: &Args) -> (Box<dyn Transition>, Option<Rc<RefCell<Fade>>>) {
        let fade = match args.transition {
            TransitionArg::Instant => return (Box::new(Immediate::default()), None),
            TransitionArg::Fade => Fade::to_black(args.duration),
            TransitionArg::Crossfade => Fade::crossfade(args.duration),
        };
        let fade = Rc::new(RefCell::new(fade));
        (Box::new(Rc::clone(&fade)), Some(fade))
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let DemoApp::Pending { args, properties } = self else {
            return;
        };

        let attrs = WindowAttributes::default()
            .with_title(&args.title)
            .with_visible(false)
            .with_inner_size(winit::dpi::LogicalSize::new(640, 360));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(error = %e, "failed to create window");
                event_loop.exit();
                return;
            }
        };

        let properties = std::mem::take(properties);
        match build_director(window, args, properties) {
            Ok(director) => {
                *self = DemoApp::Running {
                    director,
                    title: String::new(),
                    args: args.clone(),
                    fade: None,
                    start_time: Instant::now(),
                };
            }
            Err(e) => {
                error!(error = %e, "failed to start demo");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let DemoApp::Running {
            director,
            args,
            fade,
            title,
            start_time,
        } = self
        else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let current = director.current().map(str::to_owned);
                match (code, current.as_deref()) {
                    (KeyCode::Enter, Some("home")) => {
                        let (transition, handle) = Self::transition(args);
                        match director.show_animated("settings", transition) {
                            Ok(()) => *fade = handle,
                            Err(e) => warn!(error = %e, "cannot open settings"),
                        }
                    }
                    (KeyCode::Escape, Some("settings")) => {
                        // Settings asks for its own way back; the request runs on the next frame.
                        let back = director
                            .controller::<SettingsScreen>("settings")
                            .and_then(|s| s.back.clone());
                        if let Some(back) = back {
                            let (transition, handle) = Self::transition(args);
                            back.show_animated("home", transition);
                            *fade = handle;
                        }
                    }
                    (KeyCode::Escape, _) => event_loop.exit(),
                    _ => {}
                }
                director.surface().window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let time = start_time.elapsed().as_secs_f32();
                if director.update(time) {
                    info!(scene = director.current().unwrap_or("-"), "scene shown");
                }

                let status = status_line(director, fade.as_ref());
                if status != *title {
                    director.set_title(&status);
                    *title = status;
                }

                if director.is_transitioning() {
                    director.surface().window().request_redraw();
                } else {
                    *fade = None;
                }
            }
            _ => {}
        }
    }
}

fn status_line(director: &Director, fade: Option<&Rc<RefCell<Fade>>>) -> String {
    let base = director.config().title.as_deref().unwrap_or("Stagehand");
    let content = director.surface().current_content().copied().unwrap_or("");
    match director.state() {
        DirectorState::Idle { .. } => format!("{base} | {content}"),
        DirectorState::Transitioning { current, pending } => {
            let progress = fade
                .map(|f| {
                    let f = f.borrow();
                    format!(" {:?} {:.0}%", f.phase(), f.progress() * 100.0)
                })
                .unwrap_or_default();
            format!("{base} | {} -> {pending}{progress}", current.unwrap_or("-"))
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let properties: Properties = args
        .define
        .iter()
        .filter_map(|define| {
            let parsed = define.split_once('=');
            if parsed.is_none() {
                warn!(define = %define, "ignoring -D without '='");
            }
            parsed
        })
        .collect();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = DemoApp::Pending { args, properties };
    event_loop.run_app(&mut app)?;
    Ok(())
}
