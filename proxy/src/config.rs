use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

fn default_admin_listener() -> Listener {
    Listener {
        host: "127.0.0.1".into(),
        port: 8181,
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default = "default_admin_listener")]
    pub admin_listener: Listener,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listener: Listener::default(),
            admin_listener: default_admin_listener(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").expect("parse empty config");
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.admin_listener.port, 8181);
    }

    #[test]
    fn test_explicit_listeners() {
        let yaml = r#"
            listener:
                host: 0.0.0.0
                port: 9090
            admin_listener:
                host: 0.0.0.0
                port: 9191
            "#;
        let config: Config = serde_yaml::from_str(yaml).expect("parse config");
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.listener.port, 9090);
        assert_eq!(config.admin_listener.port, 9191);
    }
}
