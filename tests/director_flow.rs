use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use stagehand::*;

type View = String;

#[derive(Default)]
struct Home {
    api_url: String,
    retries: u32,
}

injectable!(Home {
    api_url: String => "apiUrl",
    retries: u32,
});

impl Controller<View> for Home {}

#[derive(Default)]
struct Settings {
    theme: Option<String>,
}

injectable!(Settings { theme: Option<String> });

impl Controller<View> for Settings {}

/// Jumps to `home` once prepared, as soon as the director runs its requests.
#[derive(Default)]
struct Splash {
    director: Option<DirectorHandle<View>>,
}

injectable!(Splash {});

impl Controller<View> for Splash {
    fn act(&mut self) -> Option<&mut dyn Act<View>> {
        Some(self)
    }
}

impl Act<View> for Splash {
    fn prepare(&mut self, director: DirectorHandle<View>, _root: &View) {
        director.show_animated("home", Fade::crossfade(1.0));
        self.director = Some(director);
    }
}

fn views() -> StaticViews<View> {
    StaticViews::new()
        .view("home.view", "Home", || "<home/>".to_string())
        .view("home-v2.view", "Home", || "<home version=\"2\"/>".to_string())
        .view("settings.view", "Settings", || "<settings/>".to_string())
        .view("splash.view", "Splash", || "<splash/>".to_string())
}

fn register(factory: &mut ControllerFactory<View>) {
    factory
        .register::<Home>("Home")
        .register::<Settings>("Settings")
        .register::<Splash>("Splash");
}

fn director_with(
    dependencies: Dependencies,
    resources: impl ResourceStore + 'static,
    config: DirectorConfig,
) -> SceneDirector<HeadlessSurface<View>, StaticViews<View>> {
    let mut factory = ControllerFactory::with_dependencies(dependencies, resources);
    register(&mut factory);
    SceneDirector::with_factory(HeadlessSurface::new(), views(), factory, config)
}

fn director() -> SceneDirector<HeadlessSurface<View>, StaticViews<View>> {
    director_with(
        Dependencies::new(),
        EmbeddedResources::new(),
        DirectorConfig::new(),
    )
}

#[test]
fn show_before_prepare_is_rejected() {
    let mut director = director();
    for name in ["home", "settings", ""] {
        let err = director.show(name).unwrap_err();
        assert!(matches!(err, DirectorError::UnpreparedScene(ref n) if n == name));
        assert_eq!(director.current(), None);
    }
    assert_eq!(director.surface().content_changes(), 0);
}

#[test]
fn prepared_scene_is_displayed() {
    let mut director = director();
    director.prepare("home", "home.view").unwrap();
    director.show("home").unwrap();

    assert_eq!(director.current(), Some("home"));
    assert_eq!(
        director.surface().current_content().map(String::as_str),
        Some("<home/>")
    );
}

#[test]
fn reprepare_replaces_displayed_scene() {
    let mut director = director();
    let first = director.prepare("home", "home.view").unwrap();
    director.show("home").unwrap();

    let second = director.prepare("home", "home-v2.view").unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    director.show("home").unwrap();

    assert_eq!(
        director.surface().current_content().map(String::as_str),
        Some("<home version=\"2\"/>")
    );
    let scene = director.scene("home").unwrap();
    assert!(Rc::ptr_eq(scene.controller(), &second));
}

#[test]
fn discarded_scene_cannot_be_shown() {
    let mut director = director();
    director.prepare("home", "home.view").unwrap();
    director.prepare("settings", "settings.view").unwrap();
    director.show("home").unwrap();

    director.discard("home");
    director.discard("settings");

    assert!(matches!(director.show("home"), Err(DirectorError::UnpreparedScene(_))));
    assert!(matches!(director.show("settings"), Err(DirectorError::UnpreparedScene(_))));
    assert_eq!(director.current(), Some("home"));
    assert_eq!(director.scene_names().count(), 0);
}

#[test]
fn synchronous_transition_switches_before_show_returns() {
    let mut director = director();
    director.prepare("home", "home.view").unwrap();
    director.prepare("settings", "settings.view").unwrap();
    director.show("home").unwrap();

    director
        .show_with("settings", |current, next| {
            assert_eq!(current.map(String::as_str), Some("<home/>"));
            assert_eq!(next.id.as_str(), "settings");
            Immediate::default()
        })
        .unwrap();

    assert_eq!(director.current(), Some("settings"));
}

#[test]
fn configuration_resource_beats_process_properties() {
    let dir = tempfile::tempdir().unwrap();
    let resources = DirResources::new(dir.path());
    let config_path = resources.path_for(<Home as Injectable>::namespace(), CONFIG_FILE);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "apiUrl=http://x\nretries = 3\n").unwrap();

    let properties = Properties::from_args(["--apiUrl=http://y", "-Dtheme=dark"]);
    let mut director = director_with(
        Dependencies::new().properties(properties),
        resources,
        DirectorConfig::new(),
    );
    director.prepare("home", "home.view").unwrap();
    director.prepare("settings", "settings.view").unwrap();

    let home = director.controller::<Home>("home").unwrap();
    assert_eq!(home.api_url, "http://x");
    assert_eq!(home.retries, 3);
    drop(home);

    let settings = director.controller::<Settings>("settings").unwrap();
    assert_eq!(settings.theme.as_deref(), Some("dark"));
}

#[test]
fn instantiator_fills_fields_no_named_source_maps() {
    struct Client {
        base: String,
    }

    #[derive(Default)]
    struct Account {
        api_url: String,
        client: Option<Rc<Client>>,
        missing: String,
    }

    injectable!(Account {
        api_url: String => "apiUrl",
        client: Option<Rc<Client>> => "client",
        missing: String,
    });

    let dependencies = Dependencies::new().instantiator(|name: &str| match name {
        "apiUrl" => Some(Value::text("http://instantiated")),
        "client" => Some(Value::shared(Client {
            base: "http://client".to_string(),
        })),
        _ => None,
    });
    let factory =
        ControllerFactory::<View>::with_dependencies(dependencies, EmbeddedResources::new());

    let mut account = Account::default();
    let report = factory.resolve(&mut account);

    assert_eq!(account.api_url, "http://instantiated");
    assert_eq!(account.client.as_ref().map(|c| c.base.as_str()), Some("http://client"));
    assert_eq!(account.missing, "");
    assert_eq!(report.source_of("api_url"), Some("instantiator"));
    assert_eq!(report.unresolved().collect::<Vec<_>>(), vec!["missing"]);
    assert_eq!(report.diagnostics.len(), 1);

    let again = factory.resolve(&mut account);
    assert_eq!(account.api_url, "http://instantiated");
    assert_eq!(again.resolved, report.resolved);
}

#[test]
fn acting_controller_drives_the_director() {
    let mut director = director();
    director.prepare("home", "home.view").unwrap();
    director.prepare("splash", "splash.view").unwrap();
    director.show("splash").unwrap();

    assert!(director.controller::<Splash>("splash").unwrap().director.is_some());
    assert!(!director.is_transitioning());

    // The queued crossfade starts on the first update and ends a second later.
    assert!(!director.update(0.0));
    assert!(director.is_transitioning());
    assert!(!director.update(0.5));
    assert_eq!(director.current(), Some("splash"));

    assert!(director.update(1.0));
    assert_eq!(director.current(), Some("home"));
}

#[test]
fn policies_resolve_competing_transitions() {
    let fades = |policy: TransitionPolicy| {
        let mut director = director_with(
            Dependencies::new(),
            EmbeddedResources::new(),
            DirectorConfig::new().transition_policy(policy),
        );
        director.prepare("home", "home.view").unwrap();
        director.prepare("settings", "settings.view").unwrap();
        director.show_animated("settings", Fade::to_black(4.0)).unwrap();
        director.update(0.0);
        let second = director.show_animated("home", Fade::to_black(1.0));
        director.update(0.5);
        (director, second)
    };

    let (mut supersede, second) = fades(TransitionPolicy::Supersede);
    second.unwrap();
    assert!(supersede.update(1.5));
    assert_eq!(supersede.current(), Some("home"));
    assert!(!supersede.update(4.0));
    assert_eq!(supersede.current(), Some("home"));

    let (mut reject, second) = fades(TransitionPolicy::Reject);
    assert!(matches!(second, Err(DirectorError::TransitionInFlight { .. })));
    assert!(!reject.update(1.5));
    assert!(reject.update(4.0));
    assert_eq!(reject.current(), Some("settings"));

    let (mut overlap, second) = fades(TransitionPolicy::Overlap);
    second.unwrap();
    overlap.update(1.5);
    assert_eq!(overlap.current(), Some("home"));
    assert!(overlap.is_transitioning());
    assert!(overlap.update(4.0));
    assert_eq!(overlap.current(), Some("settings"));
    assert!(!overlap.is_transitioning());
}

#[test]
fn host_can_observe_a_shared_transition() {
    let mut director = director();
    director.prepare("home", "home.view").unwrap();
    director.prepare("settings", "settings.view").unwrap();
    director.show("home").unwrap();

    let fade = Rc::new(RefCell::new(Fade::to_black(1.0).easing(Easing::Linear)));
    director.show_animated("settings", Rc::clone(&fade)).unwrap();

    director.update(10.0);
    director.update(10.25);
    let alpha = fade.borrow().overlay().map(|c| c.w).unwrap();
    assert!((alpha - 0.5).abs() < 1e-5);

    director.update(11.0);
    assert!(fade.borrow().is_finished());
    assert_eq!(director.current(), Some("settings"));
}

#[test]
fn title_from_config_is_applied() {
    let director = director_with(
        Dependencies::new(),
        EmbeddedResources::new(),
        DirectorConfig::new().title("Stagehand"),
    );
    assert_eq!(director.surface().title(), "Stagehand");
}
