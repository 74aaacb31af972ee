use crate::theme::Theme;
use crate::utils::*;
use divbreak_core as game;
use serde::{Deserialize, Serialize};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Last-applied mission parameters, persisted across visits.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct MissionSettings {
    pub dividend: game::Strength,
    pub divisor: game::Quotient,
}

impl MissionSettings {
    pub(crate) fn game_config(self) -> game::GameConfig {
        game::GameConfig::new_unchecked(self.dividend, self.divisor)
    }
}

impl Default for MissionSettings {
    fn default() -> Self {
        let config = game::GameConfig::default();
        Self {
            dividend: config.dividend,
            divisor: config.divisor,
        }
    }
}

impl StorageKey for MissionSettings {
    const KEY: &'static str = "divbreak:settings:v1";
}

/// The form owns range validation; the engine only ever sees values that
/// already passed it.
fn validate(dividend: &str, divisor: &str) -> Result<MissionSettings, &'static str> {
    let Ok(dividend) = dividend.trim().parse::<game::Strength>() else {
        return Err("Dividend must be at least 10");
    };
    if dividend < *game::GameConfig::DIVIDEND_RANGE.start() {
        return Err("Dividend must be at least 10");
    }
    if dividend > *game::GameConfig::DIVIDEND_RANGE.end() {
        return Err("Dividend must be less than 1000");
    }

    let Ok(divisor) = divisor.trim().parse::<game::Quotient>() else {
        return Err("Divisor must be at least 2");
    };
    if divisor < *game::GameConfig::DIVISOR_RANGE.start() {
        return Err("Divisor must be at least 2");
    }
    if divisor > *game::GameConfig::DIVISOR_RANGE.end() {
        return Err("Divisor must be less than 20");
    }

    Ok(MissionSettings { dividend, divisor })
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub current: MissionSettings,
    pub onlaunch: Callback<MissionSettings>,
    pub onclose: Callback<()>,
}

#[function_component(SettingsView)]
pub(crate) fn settings_component(props: &SettingsProps) -> Html {
    let dividend = use_state(|| props.current.dividend.to_string());
    let divisor = use_state(|| props.current.divisor.to_string());
    let error = use_state(|| None::<&'static str>);

    {
        let dividend = dividend.clone();
        let divisor = divisor.clone();
        let error = error.clone();
        use_effect_with((props.open, props.current), move |(open, current)| {
            if *open {
                dividend.set(current.dividend.to_string());
                divisor.set(current.divisor.to_string());
                error.set(None);
            }
        });
    }

    let on_dividend = {
        let dividend = dividend.clone();
        Callback::from(move |e: InputEvent| {
            dividend.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_divisor = {
        let divisor = divisor.clone();
        Callback::from(move |e: InputEvent| {
            divisor.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_cancel = {
        let onclose = props.onclose.clone();
        Callback::from(move |_: MouseEvent| onclose.emit(()))
    };
    let on_launch = {
        let dividend = dividend.clone();
        let divisor = divisor.clone();
        let error = error.clone();
        let onlaunch = props.onlaunch.clone();
        Callback::from(move |_: MouseEvent| match validate(&dividend, &divisor) {
            Ok(settings) => onlaunch.emit(settings),
            Err(message) => error.set(Some(message)),
        })
    };

    let switch_theme = |theme: Theme| Callback::from(move |_: MouseEvent| Theme::apply(theme));

    html! {
        <dialog id="settings" open={props.open}>
            <article>
                <h2>{"CUSTOMIZE MISSION"}</h2>
                <div class="fields">
                    <label class="wall-total">
                        {"Wall Strength (Dividend)"}
                        <input type="number" value={(*dividend).clone()} oninput={on_dividend}/>
                    </label>
                    <label class="core-count">
                        {"Power Barrels (Divisor)"}
                        <input type="number" value={(*divisor).clone()} oninput={on_divisor}/>
                    </label>
                </div>
                if let Some(message) = *error {
                    <p class="form-error">{message}</p>
                }
                <ul class="theme-switcher">
                    <li><a href="#" onclick={switch_theme(Theme::Light)}>{"Light"}</a></li>
                    <li><a href="#" onclick={switch_theme(Theme::Dark)}>{"Dark"}</a></li>
                </ul>
                <footer>
                    <button type="reset" onclick={on_cancel}>{"Cancel"}</button>
                    <button onclick={on_launch}>{"Launch Mission"}</button>
                </footer>
            </article>
        </dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_accepts_the_contract_boundaries() {
        assert_eq!(
            validate("10", "2"),
            Ok(MissionSettings {
                dividend: 10,
                divisor: 2
            })
        );
        assert_eq!(
            validate(" 999 ", "20"),
            Ok(MissionSettings {
                dividend: 999,
                divisor: 20
            })
        );
    }

    #[test]
    fn form_rejects_out_of_range_and_garbage_input() {
        assert_eq!(validate("9", "6"), Err("Dividend must be at least 10"));
        assert_eq!(validate("1000", "6"), Err("Dividend must be less than 1000"));
        assert_eq!(validate("366", "1"), Err("Divisor must be at least 2"));
        assert_eq!(validate("366", "21"), Err("Divisor must be less than 20"));
        assert_eq!(validate("wall", "6"), Err("Dividend must be at least 10"));
        assert_eq!(validate("366", ""), Err("Divisor must be at least 2"));
    }

    #[test]
    fn validated_settings_satisfy_the_engine_contract() {
        let settings = validate("123", "7").unwrap();
        assert!(game::GameConfig::new(settings.dividend, settings.divisor).is_ok());
    }
}
