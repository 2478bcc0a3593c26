use khvhdl::vhdl::*;
use khvhdl::*;

use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    let out_dir = env::var("OUT_DIR").unwrap();

    let adders = adders();
    convert(&out_dir, "adders", &adders, Config::new())?;
    convert(&out_dir, "adders_flat", &adders, Config::new().max_depth(Depth::Limited(0)))?;
    convert(
        &out_dir,
        "adders_bookkeeping",
        &adders,
        Config::new().no_component_files(true),
    )?;

    let nested = nested();
    convert(&out_dir, "nested", &nested, Config::new())?;
    convert(&out_dir, "nested_1", &nested, Config::new().max_depth(Depth::Limited(1)))?;
    convert(&out_dir, "nested_0", &nested, Config::new().max_depth(Depth::Limited(0)))?;

    convert(&out_dir, "helper", &helper(), Config::new())?;
    convert(&out_dir, "modes", &modes(), Config::new())?;
    convert(&out_dir, "lookup", &lookup(), Config::new())?;
    convert(&out_dir, "siblings", &siblings(), Config::new())?;
    convert(&out_dir, "shared_leaf", &shared_leaf(), Config::new())?;

    Ok(())
}

/// A design together with its top block and a builder for the top-level arguments.
struct Reference {
    design: Design,
    top: BlockId,
    args: for<'a> fn(&'a Context<'a>) -> Args<'a>,
}

fn convert(out_dir: &str, scenario: &str, reference: &Reference, config: Config) -> Result<()> {
    let dir = Path::new(out_dir).join(scenario);
    fs::create_dir_all(&dir)?;
    let mut sink = FileSink::new(dir.clone());

    let c = Context::new();
    let args = (reference.args)(&c);
    let report = Convertor::new(config).convert(&c, &reference.design, reference.top, args, &mut sink)?;

    // Lets the tests check which entities were written, and in which order
    fs::write(dir.join("components.txt"), report.components.join("\n"))?;

    Ok(())
}

fn byte_ports<'a>(c: &'a Context<'a>) -> Args<'a> {
    Args::new()
        .signal("x", c.signal(Bits::new(0u32, 8)))
        .signal("y", c.signal(Bits::new(0u32, 8)))
        .signal("z", c.signal(Bits::new(0u32, 8)))
}

/// Two adders called with identical widths and one with a narrower output.
fn adders() -> Reference {
    let mut d = Design::new();
    let adder = d.block("adder", &["a", "b", "sum"], |s, args| {
        let a = args.get_signal("a")?;
        let b = args.get_signal("b")?;
        let sum = args.get_signal("sum")?;
        s.comb("logic", vec![Stmt::assign(sum, a + b)]);
        Ok(())
    });
    let top = d.block("top", &["x", "y", "z"], move |s, args| {
        let x = args.get_signal("x")?;
        let y = args.get_signal("y")?;
        let z = args.get_signal("z")?;
        let t = s.signal("t", Bits::new(0u32, 8));
        let narrow = s.signal("narrow", Bits::new(0u32, 4));
        s.instance("add0", adder, Args::new().signal("a", x).signal("b", y).signal("sum", t))?;
        s.instance("add1", adder, Args::new().signal("a", t).signal("b", y).signal("sum", z))?;
        s.instance(
            "add2",
            adder,
            Args::new().signal("a", x).signal("b", y).signal("sum", narrow),
        )
    });

    Reference {
        design: d,
        top,
        args: byte_ports,
    }
}

/// Three levels: the top instantiates `mid`, which instantiates `leaf` twice.
fn nested() -> Reference {
    let mut d = Design::new();
    let leaf = d.block("leaf", &["clk", "d", "q"], |s, args| {
        let clk = args.get_signal("clk")?;
        let d = args.get_signal("d")?;
        let q = args.get_signal("q")?;
        s.seq("update", clk, vec![Stmt::assign(q, !d)]);
        Ok(())
    });
    let mid = d.block("mid", &["clk", "d", "q"], move |s, args| {
        let clk = args.get_signal("clk")?;
        let d = args.get_signal("d")?;
        let q = args.get_signal("q")?;
        let link = s.signal("link", Bits::new(0u32, 4));
        s.instances(
            "stage",
            leaf,
            vec![
                Args::new().signal("clk", clk).signal("d", d).signal("q", link),
                Args::new().signal("clk", clk).signal("d", link).signal("q", q),
            ],
        )
    });
    let top = d.block("top", &["clk", "d", "q", "valid"], move |s, args| {
        let clk = args.get_signal("clk")?;
        let d = args.get_signal("d")?;
        let q = args.get_signal("q")?;
        let valid = args.get_signal("valid")?;
        s.comb("flag", vec![Stmt::assign(valid, Expr::from(d).ne(Expr::lit(Bits::new(0u32, 4))))]);
        s.instance("pipe", mid, Args::new().signal("clk", clk).signal("d", d).signal("q", q))
    });

    Reference {
        design: d,
        top,
        args: |c| {
            Args::new()
                .signal("clk", c.signal(false))
                .signal("d", c.signal(Bits::new(0u32, 4)))
                .signal("q", c.signal(Bits::new(0u32, 4)))
                .signal("valid", c.signal(false))
        },
    }
}

/// A leading-underscore block whose ports are reserved words, under a leading-underscore top.
fn helper() -> Reference {
    let mut d = Design::new();
    let helper = d.block("_helper", &["in", "out"], |s, args| {
        let i = args.get_signal("in")?;
        let o = args.get_signal("out")?;
        s.comb("pass", vec![Stmt::assign(o, i)]);
        Ok(())
    });
    let top = d.block("_top", &["a", "b"], move |s, args| {
        let a = args.get_signal("a")?;
        let b = args.get_signal("b")?;
        s.instance("h", helper, Args::new().signal("in", a).signal("out", b))
    });

    Reference {
        design: d,
        top,
        args: |c| Args::new().signal("a", c.signal(false)).signal("b", c.signal(false)),
    }
}

/// A component with an enumerated port type.
fn modes() -> Reference {
    let mut d = Design::new();
    let selector = d.block("selector", &["mode", "a", "b", "o"], |s, args| {
        let mode = args.get_signal("mode")?;
        let a = args.get_signal("a")?;
        let b = args.get_signal("b")?;
        let o = args.get_signal("o")?;
        let ty = EnumType::new("mode", &["fast", "slow"]);
        s.comb(
            "choose",
            vec![Stmt::when(
                Expr::from(mode).eq(Expr::lit(EnumType::item(&ty, "fast"))),
                vec![Stmt::assign(o, a)],
                vec![Stmt::assign(o, b)],
            )],
        );
        Ok(())
    });
    let top = d.block("top", &["mode", "a", "b", "o"], move |s, args| {
        let sel_args = Args::new()
            .signal("mode", args.get_signal("mode")?)
            .signal("a", args.get_signal("a")?)
            .signal("b", args.get_signal("b")?)
            .signal("o", args.get_signal("o")?);
        s.instance("sel", selector, sel_args)
    });

    Reference {
        design: d,
        top,
        args: |c| {
            let ty = EnumType::new("mode", &["fast", "slow"]);
            Args::new()
                .signal("mode", c.signal(EnumType::item(&ty, "slow")))
                .signal("a", c.signal(false))
                .signal("b", c.signal(false))
                .signal("o", c.signal(false))
        },
    }
}

/// A memory declared by the top and read by a component.
fn lookup() -> Reference {
    let mut d = Design::new();
    let rom = d.block("rom", &["addr", "q", "data"], |s, args| {
        let addr = args.get_signal("addr")?;
        let q = args.get_signal("q")?;
        let data = args.get_memory("data")?;
        s.comb("read", vec![Stmt::assign(q, Expr::read(data, addr))]);
        Ok(())
    });
    let top = d.block("top", &["addr", "q"], move |s, args| {
        let addr = args.get_signal("addr")?;
        let q = args.get_signal("q")?;
        let table = s.memory("table", 4, Bits::new(0u32, 8));
        s.instance(
            "r",
            rom,
            Args::new().signal("addr", addr).signal("q", q).memory("data", table),
        )
    });

    Reference {
        design: d,
        top,
        args: |c| {
            Args::new()
                .signal("addr", c.signal(Bits::new(0u32, 2)))
                .signal("q", c.signal(Bits::new(0u32, 8)))
        },
    }
}

/// The top declares a signal whose name collides with one declared inside an instance.
fn siblings() -> Reference {
    let mut d = Design::new();
    let stage = d.block("stage", &["i", "o"], |s, args| {
        let i = args.get_signal("i")?;
        let o = args.get_signal("o")?;
        let tmp = s.signal("tmp", false);
        s.comb("inner", vec![Stmt::assign(tmp, !i), Stmt::assign(o, tmp)]);
        Ok(())
    });
    let top = d.block("top", &["a", "b"], move |s, args| {
        let a = args.get_signal("a")?;
        let b = args.get_signal("b")?;
        let u_tmp = s.signal("u_tmp", false);
        s.instance("u", stage, Args::new().signal("i", a).signal("o", u_tmp))?;
        s.instance("v", stage, Args::new().signal("i", u_tmp).signal("o", b))
    });

    Reference {
        design: d,
        top,
        args: |c| Args::new().signal("a", c.signal(false)).signal("b", c.signal(false)),
    }
}

/// One block instantiated under different parents, with two different widths.
fn shared_leaf() -> Reference {
    let mut d = Design::new();
    let leaf = d.block("leaf", &["i", "o"], |s, args| {
        let i = args.get_signal("i")?;
        let o = args.get_signal("o")?;
        s.comb("invert", vec![Stmt::assign(o, !i)]);
        Ok(())
    });
    let wide = d.block("wide", &["i", "o"], wrap(leaf));
    let narrow = d.block("narrow", &["i", "o"], wrap(leaf));
    let relay = d.block("relay", &["i", "o"], wrap(leaf));
    let top = d.block("top", &["a", "b", "c", "x", "y", "z"], move |s, args| {
        let w_args = Args::new()
            .signal("i", args.get_signal("a")?)
            .signal("o", args.get_signal("x")?);
        s.instance("w", wide, w_args)?;
        let n_args = Args::new()
            .signal("i", args.get_signal("b")?)
            .signal("o", args.get_signal("y")?);
        s.instance("n", narrow, n_args)?;
        let r_args = Args::new()
            .signal("i", args.get_signal("c")?)
            .signal("o", args.get_signal("z")?);
        s.instance("r", relay, r_args)
    });

    Reference {
        design: d,
        top,
        args: |c| {
            Args::new()
                .signal("a", c.signal(Bits::new(0u32, 8)))
                .signal("b", c.signal(Bits::new(0u32, 4)))
                .signal("c", c.signal(Bits::new(0u32, 8)))
                .signal("x", c.signal(Bits::new(0u32, 8)))
                .signal("y", c.signal(Bits::new(0u32, 4)))
                .signal("z", c.signal(Bits::new(0u32, 8)))
        },
    }
}

/// A block body that passes its ports straight through to one instance of `inner`.
fn wrap(inner: BlockId) -> impl for<'a, 'e> Fn(&mut Scope<'a, 'e>, &Args<'a>) -> Result<()> {
    move |s, args| {
        let i = args.get_signal("i")?;
        let o = args.get_signal("o")?;
        s.instance("inner", inner, Args::new().signal("i", i).signal("o", o))
    }
}
