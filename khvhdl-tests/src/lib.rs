#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use std::collections::BTreeSet;
    use std::fs;
    use std::path::{Path, PathBuf};

    macro_rules! generated {
        ($scenario:literal, $file:literal) => {
            include_str!(concat!(env!("OUT_DIR"), "/", $scenario, "/", $file))
        };
    }

    fn scenario_dir(scenario: &str) -> PathBuf {
        Path::new(env!("OUT_DIR")).join(scenario)
    }

    fn exists(scenario: &str, file: &str) -> bool {
        scenario_dir(scenario).join(file).exists()
    }

    fn components(list: &str) -> Vec<&str> {
        list.lines().collect()
    }

    /// Names of every process written in a scenario, without their unique `KH<n>_` prefix.
    fn process_names(scenario: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(scenario_dir(scenario)).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().map_or(true, |ext| ext != "vhd") {
                continue;
            }
            let text = fs::read_to_string(&path).unwrap();
            for line in text.lines() {
                let line = line.trim();
                if let Some(index) = line.find(": process (") {
                    let label = &line[..index];
                    let name = match label.find('_') {
                        Some(underscore) if label.starts_with("KH") => &label[underscore + 1..],
                        _ => label,
                    };
                    names.insert(name.to_string());
                }
            }
        }
        names
    }

    #[test]
    fn adders_share_equivalent_components() {
        assert_eq!(
            components(generated!("adders", "components.txt")),
            vec!["adder_0", "adder_1", "top"]
        );

        let top = generated!("adders", "top.vhd");
        assert!(top.contains("use work.adder_0;\nuse work.adder_1;\n"));
        assert!(top.contains("add0 : entity work.adder_0\n"));
        assert!(top.contains("add1 : entity work.adder_0\n"));
        assert!(top.contains("add2 : entity work.adder_1\n"));
        assert_eq!(top.matches("port map (").count(), 3);
        assert!(top.contains("signal t: unsigned(7 downto 0);"));
        assert!(top.contains("signal narrow: unsigned(3 downto 0);"));
        assert!(!top.contains("process"));

        let wide = generated!("adders", "adder_0.vhd");
        assert!(wide.starts_with("-- File: adder_0.vhd\n"));
        assert!(wide.contains("entity adder_0 is"));
        assert!(wide.contains("sum: out unsigned(7 downto 0)"));
        assert!(wide.contains("sum <= (a + b);"));

        let narrow = generated!("adders", "adder_1.vhd");
        assert!(narrow.contains("entity adder_1 is"));
        assert!(narrow.contains("sum: out unsigned(3 downto 0)"));
    }

    #[test]
    fn adders_port_maps_use_parent_signals() {
        let top = generated!("adders", "top.vhd");
        assert!(top.contains(
            "add0 : entity work.adder_0\n    \
             port map (\n        \
             a => x,\n        \
             b => y,\n        \
             sum => t\n    \
             );\n"
        ));
        assert!(top.contains(
            "add1 : entity work.adder_0\n    \
             port map (\n        \
             a => t,\n        \
             b => y,\n        \
             sum => z\n    \
             );\n"
        ));
    }

    #[test]
    fn support_package_written_once_by_outermost_call() {
        let support = generated!("adders", "pck_khvhdl_01.vhd");
        assert!(support.contains("package pck_khvhdl_01 is"));
        for file in ["adder_0.vhd", "adder_1.vhd", "top.vhd"].iter() {
            let text = fs::read_to_string(scenario_dir("adders").join(file)).unwrap();
            assert_eq!(text.matches("use work.pck_khvhdl_01.all;").count(), 1);
        }
    }

    #[test]
    fn flat_conversion_writes_one_entity() {
        assert_eq!(components(generated!("adders_flat", "components.txt")), vec!["top"]);
        assert!(!exists("adders_flat", "adder_0.vhd"));
        assert!(!exists("adders_flat", "adder_1.vhd"));

        let top = generated!("adders_flat", "top.vhd");
        assert!(!top.contains("entity work."));
        assert_eq!(top.matches(": process (all) is").count(), 3);

        assert_eq!(components(generated!("nested_0", "components.txt")), vec!["top"]);
        assert!(!exists("nested_0", "mid.vhd"));
        assert!(!exists("nested_0", "leaf.vhd"));
    }

    #[test]
    fn bookkeeping_mode_writes_only_the_parent() {
        assert_eq!(
            components(generated!("adders_bookkeeping", "components.txt")),
            vec!["top"]
        );
        assert!(!exists("adders_bookkeeping", "adder_0.vhd"));
        assert!(!exists("adders_bookkeeping", "adder_1.vhd"));

        let top = generated!("adders_bookkeeping", "top.vhd");
        assert!(top.contains("use work.adder_0;\nuse work.adder_1;\n"));
        assert!(top.contains("add2 : entity work.adder_1\n"));
        assert_eq!(top.matches("port map (").count(), 3);
    }

    #[test]
    fn depth_limit_stops_recursion() {
        assert_eq!(
            components(generated!("nested", "components.txt")),
            vec!["leaf", "mid", "top"]
        );
        assert!(generated!("nested", "mid.vhd").contains("stage_1 : entity work.leaf\n"));

        assert_eq!(
            components(generated!("nested_1", "components.txt")),
            vec!["mid", "top"]
        );
        assert!(!exists("nested_1", "leaf.vhd"));
        let mid = generated!("nested_1", "mid.vhd");
        assert!(!mid.contains("entity work."));
        assert_eq!(mid.matches(": process (clk) is").count(), 2);
        assert!(generated!("nested_1", "top.vhd").contains("pipe : entity work.mid\n"));
    }

    #[test]
    fn depth_only_changes_packaging() {
        let unlimited = process_names("nested");
        assert_eq!(
            unlimited,
            vec!["FLAG".to_string(), "UPDATE".to_string()].into_iter().collect()
        );
        assert_eq!(process_names("nested_1"), unlimited);
        assert_eq!(process_names("nested_0"), unlimited);

        assert_eq!(process_names("adders"), process_names("adders_flat"));
    }

    #[test]
    fn reserved_names_are_rewritten() {
        assert_eq!(
            components(generated!("helper", "components.txt")),
            vec!["kh_helper", "kh_top"]
        );

        let helper = generated!("helper", "kh_helper.vhd");
        assert!(helper.contains("entity kh_helper is"));
        assert!(helper.contains("kh_in: in std_logic;"));
        assert!(helper.contains("kh_out: out std_logic"));
        assert!(helper.contains("kh_out <= kh_in;"));

        assert!(!exists("helper", "_top.vhd"));
        let top = generated!("helper", "kh_top.vhd");
        assert!(top.contains("entity kh_top is"));
        assert!(top.contains("h : entity work.kh_helper\n"));
        assert!(top.contains("kh_in => a,\n"));
        assert!(top.contains("kh_out => b\n"));
    }

    #[test]
    fn enum_port_types_go_to_side_packages() {
        let selector_package = generated!("modes", "pck_selector.vhd");
        assert!(selector_package.starts_with("-- File: pck_selector.vhd\n"));
        assert!(selector_package.contains("type t_enum_mode is (fast, slow);"));

        let selector = generated!("modes", "selector.vhd");
        assert!(selector.contains("use work.pck_selector.all;"));
        assert!(!selector.contains("type t_enum_mode"));

        let top = generated!("modes", "top.vhd");
        assert!(top.contains("use work.pck_selector.all;"));
        assert!(top.contains("use work.pck_top.all;"));
        assert!(!top.contains("package pck_top"));
        assert!(generated!("modes", "pck_top.vhd").contains("type t_enum_mode is (fast, slow);"));
    }

    #[test]
    fn memories_bind_element_wise() {
        assert_eq!(components(generated!("lookup", "components.txt")), vec!["rom", "top"]);

        let rom = generated!("lookup", "rom.vhd");
        assert!(rom.contains("data_0: in unsigned(7 downto 0);"));
        assert!(rom.contains("data_3: in unsigned(7 downto 0)"));

        let top = generated!("lookup", "top.vhd");
        assert!(top.contains("r : entity work.rom\n"));
        assert!(top.contains("data_0 => table(0),\n"));
        assert!(top.contains("data_3 => table(3)\n"));
        assert!(top.contains("signal table: t_array_table;"));
    }

    #[test]
    fn colliding_names_keep_live_signals() {
        assert_eq!(
            components(generated!("siblings", "components.txt")),
            vec!["stage", "top"]
        );

        let top = generated!("siblings", "top.vhd");
        assert!(top.contains("signal u_tmp: std_logic;"));
        assert!(!top.contains("signal v_tmp"));
        assert!(top.contains("o => u_tmp\n"));
        assert!(top.contains("i => u_tmp,\n"));

        let stage = generated!("siblings", "stage.vhd");
        assert!(stage.contains("signal tmp: std_logic;"));
    }

    #[test]
    fn shared_leaf_names_are_unique_across_parents() {
        assert_eq!(
            components(generated!("shared_leaf", "components.txt")),
            vec!["leaf", "wide", "leaf_1", "narrow", "relay", "top"]
        );

        assert!(generated!("shared_leaf", "leaf.vhd").contains("i: in unsigned(7 downto 0);"));
        let narrow_leaf = generated!("shared_leaf", "leaf_1.vhd");
        assert!(narrow_leaf.contains("entity leaf_1 is"));
        assert!(narrow_leaf.contains("i: in unsigned(3 downto 0);"));

        assert!(generated!("shared_leaf", "wide.vhd").contains("inner : entity work.leaf\n"));
        assert!(generated!("shared_leaf", "narrow.vhd").contains("inner : entity work.leaf_1\n"));
        let relay = generated!("shared_leaf", "relay.vhd");
        assert!(relay.contains("use work.leaf;\n"));
        assert!(relay.contains("inner : entity work.leaf\n"));
    }
}
