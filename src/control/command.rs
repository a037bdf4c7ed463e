/// Commands the dashboard can issue, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    AirConditionerOn,
    LightsOn,
    AirConditionerSleep,
    LampsOff,
    WaterPumpOff,
}

impl Command {
    /// All commands in the order they are matched against a request.
    pub const ALL: [Command; 5] = [
        Command::AirConditionerOn,
        Command::LightsOn,
        Command::AirConditionerSleep,
        Command::LampsOff,
        Command::WaterPumpOff,
    ];

    /// Text searched for in the raw request.
    pub fn request_token(self) -> &'static str {
        match self {
            Command::AirConditionerOn => "GET /ligar_arcondicionado",
            Command::LightsOn => "GET /ligar_luzes",
            Command::AirConditionerSleep => "GET /sleep_arcondicionado",
            Command::LampsOff => "GET /desligar_lampadas",
            Command::WaterPumpOff => "GET /desligar_bomba_agua",
        }
    }

    /// URL path of the command, e.g. `/ligar_luzes`.
    pub fn path(self) -> &'static str {
        &self.request_token()["GET ".len()..]
    }

    /// Button caption on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Command::AirConditionerOn => "Ligar Ar Condicionado",
            Command::LightsOn => "Ligar Luzes",
            Command::AirConditionerSleep => "Sleep para o Ar Condicionado",
            Command::LampsOff => "Desligamento Automático das Lâmpadas",
            Command::WaterPumpOff => "Desligar a Bomba d'Água",
        }
    }

    /// First command whose token occurs in `request`.
    pub fn find_in(request: &str) -> Option<Command> {
        Command::ALL
            .into_iter()
            .find(|command| request.contains(command.request_token()))
    }

    /// Command whose path is exactly `route`.
    pub fn from_route(route: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|command| command.path() == route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_strip_method_prefix() {
        assert_eq!(Command::LightsOn.path(), "/ligar_luzes");
        assert_eq!(Command::WaterPumpOff.path(), "/desligar_bomba_agua");
    }

    #[test]
    fn no_token_contains_another() {
        for a in Command::ALL {
            for b in Command::ALL {
                if a != b {
                    assert!(!a.request_token().contains(b.request_token()));
                }
            }
        }
    }
}
