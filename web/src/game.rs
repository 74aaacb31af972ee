use crate::audio::{AudioPort, SoundCue};
use crate::settings;
use crate::utils::*;
use clap::Args;
use divbreak_core as game;
use gloo::timers::callback::Timeout;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// How long transient cosmetic flags (warning flash, explosion overlay)
/// stay up before a deferred clear.
const TRANSIENT_MS: u32 = 2_000;

fn platform_audio() -> Rc<dyn AudioPort> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(crate::audio::WebAudio::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(crate::audio::NullAudio)
    }
}

fn briefing_message(config: game::GameConfig) -> String {
    format!(
        "I have your core. Break my wall to save it! Divide {} by {} using quotients.",
        config.dividend, config.divisor
    )
}

/// The running game plus the mission-console message, persisted together so
/// a reload drops the player back where they were.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct GameSession {
    pub engine: game::BreakerEngine,
    pub message: String,
}

impl GameSession {
    fn new(config: game::GameConfig) -> Self {
        Self {
            engine: game::BreakerEngine::new(config),
            message: briefing_message(config),
        }
    }

    fn restart(&mut self) {
        self.engine.reset();
        self.message = briefing_message(self.engine.config());
    }

    fn relaunch(&mut self, config: game::GameConfig) {
        self.engine.new_game(config);
        self.message = briefing_message(config);
    }

    /// Mission-console script: per-shot progress lines, overridden by the
    /// terminal-status lines.
    fn apply_outcome(&mut self, outcome: game::FireOutcome) {
        use game::FireOutcome::*;
        use game::GameStatus::*;

        self.message = match outcome {
            InvalidQuotient => {
                "ERROR: Invalid quotient detected. Enter a positive number!".to_string()
            }
            Overkill { quotient, damage } => format!(
                "WARNING: Quotient {} would cause {} damage and destroy the core!",
                quotient, damage
            ),
            Committed {
                quotient,
                damage,
                remaining,
                shots_used,
                status,
                ..
            } => match status {
                Won => "SUCCESS! Wall breached! The core has been recovered safely.".to_string(),
                Lost if remaining < 0 => {
                    "CRITICAL ERROR! Shot too powerful - core has been damaged in the breach!"
                        .to_string()
                }
                Lost => {
                    "LOCKOUT INITIATED! Too many attempts - the villain has secured the core!"
                        .to_string()
                }
                Playing => match shots_used {
                    1 => format!(
                        "DIRECT HIT! {} × {} = {}. Wall integrity at {}.",
                        quotient,
                        self.engine.divisor(),
                        damage,
                        remaining
                    ),
                    2 => "Wall integrity weakening! Keep firing strategically.".to_string(),
                    3 => "Almost there! One more precise shot needed to breach the wall."
                        .to_string(),
                    _ => self.message.clone(),
                },
            },
        };
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(game::GameConfig::default())
    }
}

impl StorageKey for GameSession {
    const KEY: &'static str = "divbreak:game:v1";
}

struct Dialogue {
    hero: &'static str,
    villain: &'static str,
    hero_active: bool,
}

fn dialogue_for(outcome: Option<game::FireOutcome>) -> Dialogue {
    use game::FireOutcome::*;
    use game::GameStatus::*;

    let Some(outcome) = outcome else {
        return Dialogue {
            hero: "Hold on, core. I'm coming for you.",
            villain: "Your precious core sits behind my wall!",
            hero_active: false,
        };
    };

    match outcome {
        InvalidQuotient => Dialogue {
            hero: "Steady. Check the console and fire again.",
            villain: "Is that supposed to be a number?",
            hero_active: false,
        },
        Overkill { .. } => Dialogue {
            hero: "Too much power. Dial it back.",
            villain: "Careful, hero. Overload my wall and your core melts with it.",
            hero_active: false,
        },
        Committed { status: Won, .. } => Dialogue {
            hero: "Core secured. Mission complete.",
            villain: "Impossible...",
            hero_active: true,
        },
        Committed { status: Lost, .. } => Dialogue {
            hero: "This is not over.",
            villain: "The core is mine now!",
            hero_active: false,
        },
        Committed {
            quality: game::ShotQuality::Weak,
            ..
        } => Dialogue {
            hero: "Just testing the defenses.",
            villain: "Pathetic! My wall barely felt that.",
            hero_active: false,
        },
        Committed { .. } => Dialogue {
            hero: "Direct hit! The wall is cracking.",
            villain: "Lucky shot.",
            hero_active: true,
        },
    }
}

#[derive(Properties, Clone, PartialEq)]
struct ShotPipsProps {
    used: usize,
}

#[function_component(ShotPips)]
fn shot_pips_component(props: &ShotPipsProps) -> Html {
    html! {
        <div class="shot-pips">
            {
                for (0..game::MAX_SHOTS).map(|i| {
                    let class = classes!("pip", (i < props.used).then_some("used"));
                    html! { <span {class}/> }
                })
            }
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct WallProps {
    remaining: game::Strength,
    dividend: game::Strength,
    #[prop_or_default]
    warning: bool,
}

#[function_component(WallView)]
fn wall_component(props: &WallProps) -> Html {
    let progress = 1.0 - f64::from(props.remaining) / f64::from(props.dividend);
    let height = (100.0 - progress * 100.0).max(5.0);
    let class = classes!("wall", props.warning.then_some("warning"));

    html! {
        <div class="wall-frame">
            <div {class} style={format!("height: {height:.0}%")}/>
            <div class="wall-counter"><span>{props.remaining}</span></div>
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CoreProps {
    status: game::GameStatus,
}

#[function_component(CoreView)]
fn core_component(props: &CoreProps) -> Html {
    use game::GameStatus::*;

    let (state, caption) = match props.status {
        Playing => ("active", "CORE ACTIVE"),
        Won => ("saved", "CORE SAVED"),
        Lost => ("compromised", "CORE COMPROMISED"),
    };

    html! {
        <div class={classes!("core", state)}>
            <div class="core-ring">
                <div class="core-inner">
                    <div class="core-glow"/>
                </div>
            </div>
            <p class="core-caption">{caption}</p>
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct MessageProps {
    message: AttrValue,
    status: game::GameStatus,
}

#[function_component(MessageView)]
fn message_component(props: &MessageProps) -> Html {
    use game::GameStatus::*;

    let state = match props.status {
        Playing => "playing",
        Won => "won",
        Lost => "lost",
    };

    html! {
        <div class={classes!("cyber-panel", "console", state)}>
            <p>{props.message.clone()}</p>
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct LedgerProps {
    dividend: game::Strength,
    divisor: game::Quotient,
    shots: Vec<game::Shot>,
    remaining: game::Strength,
}

#[function_component(HistoryView)]
fn history_component(props: &LedgerProps) -> Html {
    html! {
        <div class="cyber-panel history">
            <h3>{"SHOT HISTORY"}</h3>
            <div class="ledger">
                <div class="row">
                    <span>{"Starting:"}</span>
                    <span class="wall-total">{props.dividend}</span>
                </div>
                {
                    for props.shots.iter().enumerate().map(|(index, shot)| html! {
                        <div class="row shot">
                            <span>{format!("Shot {}: {} × {}", index + 1, shot.quotient, props.divisor)}</span>
                            <span>{format!("-{}", shot.damage)}</span>
                        </div>
                    })
                }
                <div class="row total">
                    <span>{"Remaining:"}</span>
                    <span class={classes!((props.remaining == 0).then_some("breached"))}>
                        {props.remaining}
                    </span>
                </div>
            </div>
        </div>
    }
}

#[function_component(DivisionLedger)]
fn division_ledger_component(props: &LedgerProps) -> Html {
    let quotient_sum: game::Quotient = props.shots.iter().map(|shot| shot.quotient).sum();
    let quotient_line = props
        .shots
        .iter()
        .map(|shot| shot.quotient.to_string())
        .collect::<Vec<_>>()
        .join(" + ");

    html! {
        <div class="cyber-panel long-division">
            <h3>{"LONG DIVISION"}</h3>
            if !props.shots.is_empty() {
                <div class="quotient-line">{format!("{} = {}", quotient_line, quotient_sum)}</div>
            }
            <div class="work">
                <span class="core-count">{props.divisor}</span>
                <div class="column">
                    <div class="wall-total">{props.dividend}</div>
                    {
                        for props.shots.iter().map(|shot| html! {
                            <div class="subtract">
                                {format!("- {}", shot.damage)}
                                <small>{format!("{} × {}", props.divisor, shot.quotient)}</small>
                            </div>
                        })
                    }
                    <div class={classes!("rest", (props.remaining == 0).then_some("breached"))}>
                        {props.remaining}
                    </div>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct DialogueProps {
    hero: AttrValue,
    villain: AttrValue,
    #[prop_or_default]
    hero_active: bool,
}

#[function_component(DialogueView)]
fn dialogue_component(props: &DialogueProps) -> Html {
    html! {
        <div class="dialogue">
            <div class={classes!("cyber-panel", "speaker", "hero", props.hero_active.then_some("speaking"))}>
                <p>{props.hero.clone()}</p>
            </div>
            <div class={classes!("cyber-panel", "speaker", "villain", (!props.hero_active).then_some("speaking"))}>
                <p>{props.villain.clone()}</p>
            </div>
        </div>
    }
}

#[function_component(ExplosionView)]
fn explosion_component() -> Html {
    html! {
        <div class="explosion-overlay">
            <div class="explosion">
                <div class="ring"/>
                <div class="ring delay-1"/>
                <div class="ring delay-2"/>
                {
                    for (0..20).map(|i| html! {
                        <div class="particle" style={format!("--angle: {}deg; --delay: {}ms", i * 18, i * 50)}/>
                    })
                }
            </div>
            <h2>{"CORE OVERLOAD"}</h2>
            <p>{"Critical System Failure"}</p>
        </div>
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Fire(game::Quotient),
    CustomInput(String),
    FireCustom,
    ToggleCustomInput,
    Restart,
    ToggleSettings,
    ApplySettings(settings::MissionSettings),
    ClearWarning,
    ClearExplosion,
    ToggleMusic,
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Override the wall strength for the first mission
    #[arg(long)]
    #[prop_or_default]
    pub dividend: Option<game::Strength>,

    /// Override the barrel count for the first mission
    #[arg(long)]
    #[prop_or_default]
    pub divisor: Option<game::Quotient>,
}

pub(crate) struct GameView {
    settings: settings::MissionSettings,
    session: GameSession,
    audio: Rc<dyn AudioPort>,
    last_outcome: Option<game::FireOutcome>,
    custom_quotient: String,
    show_custom_input: bool,
    show_warning: bool,
    show_explosion: bool,
    music_on: bool,
    settings_open: bool,
    warning_timer: Option<Timeout>,
    explosion_timer: Option<Timeout>,
}

impl GameView {
    fn handle_outcome(
        &mut self,
        ctx: &Context<Self>,
        outcome: game::Result<game::FireOutcome>,
    ) -> bool {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("shot rejected: {}", err);
                return false;
            }
        };

        self.session.apply_outcome(outcome);
        self.last_outcome = Some(outcome);

        use game::FireOutcome::*;
        match outcome {
            InvalidQuotient => {}
            Overkill { .. } => {
                self.audio.play(SoundCue::Explosion);
                self.show_warning = true;
                self.show_explosion = true;

                let link = ctx.link().clone();
                self.warning_timer = Some(Timeout::new(TRANSIENT_MS, move || {
                    link.send_message(Msg::ClearWarning)
                }));
                let link = ctx.link().clone();
                self.explosion_timer = Some(Timeout::new(TRANSIENT_MS, move || {
                    link.send_message(Msg::ClearExplosion)
                }));
            }
            Committed {
                quality, status, ..
            } => {
                self.custom_quotient.clear();
                match quality {
                    game::ShotQuality::Weak => self.audio.play(SoundCue::Shoot),
                    game::ShotQuality::Solid => self.audio.play(SoundCue::Break),
                }
                match status {
                    game::GameStatus::Won => self.audio.play(SoundCue::LevelComplete),
                    game::GameStatus::Lost => self.audio.play(SoundCue::GameOver),
                    game::GameStatus::Playing => {}
                }
            }
        }

        true
    }

    /// Dropping a pending `Timeout` cancels it; a clear that already fired
    /// only ever touched the display flags, so either way is harmless.
    fn clear_transients(&mut self) {
        self.last_outcome = None;
        self.custom_quotient.clear();
        self.show_custom_input = false;
        self.show_warning = false;
        self.show_explosion = false;
        self.warning_timer = None;
        self.explosion_timer = None;
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mut settings: settings::MissionSettings = LocalOrDefault::local_or_default();

        let overridden = props.dividend.is_some() || props.divisor.is_some();
        if overridden {
            let dividend = props.dividend.unwrap_or(settings.dividend);
            let divisor = props.divisor.unwrap_or(settings.divisor);
            match game::GameConfig::new(dividend, divisor) {
                Ok(config) => {
                    settings = settings::MissionSettings {
                        dividend: config.dividend,
                        divisor: config.divisor,
                    }
                }
                Err(err) => log::warn!("ignoring mission override: {}", err),
            }
        }

        let session = if overridden {
            GameSession::new(settings.game_config())
        } else {
            LocalOrDefault::local_or_default()
        };

        Self {
            settings,
            session,
            audio: platform_audio(),
            last_outcome: None,
            custom_quotient: String::new(),
            show_custom_input: false,
            show_warning: false,
            show_explosion: false,
            music_on: false,
            settings_open: false,
            warning_timer: None,
            explosion_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Fire(quotient) => {
                log::debug!("quick fire: {}", quotient);
                let outcome = self.session.engine.fire(quotient);
                self.handle_outcome(ctx, outcome)
            }
            CustomInput(value) => {
                // digits only, matching the input filter of the console field
                if value.chars().all(|c| c.is_ascii_digit()) {
                    self.custom_quotient = value;
                    true
                } else {
                    false
                }
            }
            FireCustom => {
                let input = std::mem::take(&mut self.custom_quotient);
                log::debug!("custom fire: {:?}", input);
                let outcome = self.session.engine.fire_input(&input);
                self.handle_outcome(ctx, outcome);
                true
            }
            ToggleCustomInput => {
                self.show_custom_input = !self.show_custom_input;
                true
            }
            Restart => {
                log::debug!("restart mission");
                self.session.restart();
                self.clear_transients();
                true
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            ApplySettings(settings) => {
                self.settings_open = false;
                match game::GameConfig::new(settings.dividend, settings.divisor) {
                    Ok(config) => {
                        self.settings = settings;
                        self.settings.local_save();
                        self.session.relaunch(config);
                        self.clear_transients();
                    }
                    Err(err) => log::warn!("settings rejected: {}", err),
                }
                true
            }
            ClearWarning => {
                self.warning_timer = None;
                std::mem::take(&mut self.show_warning)
            }
            ClearExplosion => {
                self.explosion_timer = None;
                std::mem::take(&mut self.show_explosion)
            }
            ToggleMusic => {
                self.music_on = !self.music_on;
                self.audio.set_music(self.music_on);
                true
            }
        };

        self.session.local_save();
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use crate::settings::SettingsView;
        use Msg::*;

        let engine = &self.session.engine;
        let config = engine.config();
        let status = engine.status();
        let playing = status.is_playing();
        let remaining = engine.remaining();
        let shots = engine.shots().to_vec();
        let dialogue = dialogue_for(self.last_outcome);

        let options = (playing && remaining > 0)
            .then(|| game::derive_options(remaining, config.divisor));

        let cb_show_settings = ctx.link().callback(|_: MouseEvent| ToggleSettings);
        let cb_close_settings = ctx.link().callback(|_: ()| ToggleSettings);
        let cb_launch = ctx.link().callback(ApplySettings);
        let cb_music = ctx.link().callback(|_: MouseEvent| ToggleMusic);
        let cb_restart = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Restart
        });
        let cb_toggle_custom = ctx.link().callback(|_: MouseEvent| ToggleCustomInput);
        let cb_custom_input = ctx.link().callback(|e: InputEvent| {
            CustomInput(e.target_unchecked_into::<HtmlInputElement>().value())
        });
        let cb_custom_fire = ctx.link().callback(|_: MouseEvent| FireCustom);
        let cb_custom_keydown = ctx
            .link()
            .batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(FireCustom));

        html! {
            <div class="divbreak" oncontextmenu={Callback::from(|e: MouseEvent| e.prevent_default())}>
                <header class="cyber-panel">
                    <div class="masthead">
                        <h1>{"DIVISION BREAKER"}</h1>
                        <div class="equation">
                            <span class="wall-total">{config.dividend}</span>
                            {" ÷ "}
                            <span class="core-count">{config.divisor}</span>
                        </div>
                        <aside class="counter">{format_for_counter(remaining)}</aside>
                        <button class={classes!("music", self.music_on.then_some("on"))} onclick={cb_music}>{"♪"}</button>
                        <small onclick={cb_show_settings}>{"···"}</small>
                    </div>
                    <p>{"Break the wall using the perfect combination of shots to save the core!"}</p>
                    <ShotPips used={engine.shots_used()}/>
                </header>

                <DialogueView hero={dialogue.hero} villain={dialogue.villain} hero_active={dialogue.hero_active}/>

                <main>
                    <section class="left">
                        <CoreView {status}/>
                        <MessageView message={self.session.message.clone()} {status}/>
                        <HistoryView
                            dividend={config.dividend}
                            divisor={config.divisor}
                            shots={shots.clone()}
                            {remaining}
                        />
                        if engine.is_finished() {
                            <button class="cyber-button restart" onclick={cb_restart}>{"RESTART MISSION"}</button>
                        }
                    </section>
                    <section class="right">
                        <WallView {remaining} dividend={config.dividend} warning={self.show_warning}/>
                        <div class="cyber-panel controls">
                            <h3>{"SHOOTER CONTROLS"}</h3>
                            <div class="barrel"><span>{format!("×{}", config.divisor)}</span></div>
                            <div class="quick-fire">
                                {
                                    match options {
                                        Some(options) => options
                                            .iter()
                                            .map(|&option| {
                                                let onclick = ctx.link().callback(move |_: MouseEvent| Fire(option));
                                                html! {
                                                    <button class="cyber-button round" {onclick}>{option}</button>
                                                }
                                            })
                                            .collect::<Html>(),
                                        None => (0..3)
                                            .map(|_| html! {
                                                <button class="cyber-button round" disabled={true}>{"-"}</button>
                                            })
                                            .collect::<Html>(),
                                    }
                                }
                            </div>
                            <div class="custom-fire">
                                <button
                                    class="cyber-button round small"
                                    onclick={cb_toggle_custom}
                                    disabled={!playing}
                                >
                                    { if self.show_custom_input { "×" } else { "⚡" } }
                                </button>
                                if self.show_custom_input {
                                    <input
                                        type="text"
                                        placeholder="Custom quotient"
                                        value={self.custom_quotient.clone()}
                                        oninput={cb_custom_input}
                                        onkeydown={cb_custom_keydown}
                                        disabled={!playing}
                                    />
                                    <button
                                        class="cyber-button"
                                        onclick={cb_custom_fire}
                                        disabled={self.custom_quotient.is_empty() || !playing}
                                    >
                                        {"FIRE"}
                                    </button>
                                }
                            </div>
                        </div>
                        <DivisionLedger
                            dividend={config.dividend}
                            divisor={config.divisor}
                            {shots}
                            {remaining}
                        />
                    </section>
                </main>

                <footer class="cyber-panel briefing">
                    <h3>{"MISSION BRIEFING"}</h3>
                    <ul>
                        <li>{"Break the wall with exactly 0 remaining to save the core."}</li>
                        <li>{format!("Each quotient you select is multiplied by {} and reduces the wall strength.", config.divisor)}</li>
                        <li>{format!("Complete the mission in {} shots or less.", game::MAX_SHOTS)}</li>
                        <li>{"Use the custom quotient option for precision attacks."}</li>
                    </ul>
                </footer>

                <SettingsView
                    open={self.settings_open}
                    current={self.settings}
                    onlaunch={cb_launch}
                    onclose={cb_close_settings}
                />
                if self.show_explosion {
                    <Modal><ExplosionView/></Modal>
                }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mission_script_follows_the_shot_progression() {
        let mut session = GameSession::default();

        let outcome = session.engine.fire(10).unwrap();
        session.apply_outcome(outcome);
        assert_eq!(
            session.message,
            "DIRECT HIT! 10 × 6 = 60. Wall integrity at 306."
        );

        let outcome = session.engine.fire(10).unwrap();
        session.apply_outcome(outcome);
        assert_eq!(
            session.message,
            "Wall integrity weakening! Keep firing strategically."
        );

        let outcome = session.engine.fire(10).unwrap();
        session.apply_outcome(outcome);
        assert_eq!(
            session.message,
            "Almost there! One more precise shot needed to breach the wall."
        );
    }

    #[test]
    fn terminal_messages_override_the_progress_script() {
        let mut session = GameSession::default();
        let outcome = session.engine.fire(61).unwrap();
        session.apply_outcome(outcome);

        assert_eq!(
            session.message,
            "SUCCESS! Wall breached! The core has been recovered safely."
        );

        let mut session = GameSession::default();
        for _ in 0..4 {
            let outcome = session.engine.fire(1).unwrap();
            session.apply_outcome(outcome);
        }
        assert_eq!(
            session.message,
            "LOCKOUT INITIATED! Too many attempts - the villain has secured the core!"
        );
    }

    #[test]
    fn overkill_warns_without_touching_the_session_state() {
        let mut session = GameSession::default();

        let outcome = session.engine.fire(70).unwrap();
        session.apply_outcome(outcome);

        assert_eq!(
            session.message,
            "WARNING: Quotient 70 would cause 420 damage and destroy the core!"
        );
        assert_eq!(session.engine.remaining(), 366);
        assert_eq!(session.engine.shots_used(), 0);
    }

    #[test]
    fn restart_rewrites_the_briefing() {
        let mut session = GameSession::default();
        let outcome = session.engine.fire(61).unwrap();
        session.apply_outcome(outcome);

        session.restart();

        assert_eq!(
            session.message,
            "I have your core. Break my wall to save it! Divide 366 by 6 using quotients."
        );
        assert_eq!(session.engine.remaining(), 366);
    }

    #[test]
    fn dialogue_highlights_the_villain_on_weak_shots() {
        let mut session = GameSession::default();

        // damage 12 against 366, well under a fifth
        let weak = session.engine.fire(2).unwrap();
        assert!(!dialogue_for(Some(weak)).hero_active);

        session.restart();
        let solid = session.engine.fire(30).unwrap();
        assert!(dialogue_for(Some(solid)).hero_active);
    }

    #[test]
    fn storage_key_uses_a_versioned_namespace() {
        assert_eq!(<GameSession as StorageKey>::KEY, "divbreak:game:v1");
    }
}
