use crate::error::{Error, Result};
use crate::graph::{Args, Block, BlockId, Design};

/// Parameter name treated as an implicit bound-instance argument; call sites may omit it.
pub(crate) const SELF_PARAM: &str = "self";

/// Checks that `args` provides exactly the parameters `block` declares.
pub(crate) fn validate_args(block: &Block, args: &Args) -> Result<()> {
    for param in block.params.iter() {
        if param != SELF_PARAM && !args.contains(param) {
            return Err(Error::MissingArgument {
                block: block.name.clone(),
                param: param.clone(),
            });
        }
    }

    for (name, _) in args.iter() {
        if !block.params.iter().any(|param| param == name) {
            return Err(Error::UnknownArgument {
                block: block.name.clone(),
                arg: name.clone(),
            });
        }
    }

    Ok(())
}

/// Checks that instantiating `block` as `instance` while elaborating the blocks in `stack` doesn't form a recursive definition.
pub(crate) fn validate_instance(
    design: &Design,
    stack: &[BlockId],
    block: BlockId,
    instance: &str,
) -> Result<()> {
    if stack.contains(&block) {
        return Err(Error::RecursiveDefinition {
            block: design.get(block)?.name.clone(),
            instance: instance.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::graph::Context;

    fn design() -> (Design, BlockId) {
        let mut d = Design::new();
        let id = d.block("adder", &["a", "b", "self"], |_, _| Ok(()));
        (d, id)
    }

    #[test]
    fn missing_argument_error() {
        let (d, id) = design();
        let c = Context::new();

        let args = Args::new().signal("a", c.signal(0));

        match validate_args(d.get(id).unwrap(), &args) {
            Err(Error::MissingArgument { block, param }) => {
                assert_eq!(block, "adder");
                assert_eq!(param, "b");
            }
            _ => panic!("Expected a missing argument error"),
        }
    }

    #[test]
    fn unknown_argument_error() {
        let (d, id) = design();
        let c = Context::new();

        let args = Args::new()
            .signal("a", c.signal(0))
            .signal("b", c.signal(0))
            .value("width", 8);

        match validate_args(d.get(id).unwrap(), &args) {
            Err(Error::UnknownArgument { arg, .. }) => assert_eq!(arg, "width"),
            _ => panic!("Expected an unknown argument error"),
        }
    }

    #[test]
    fn self_parameter_is_optional() {
        let (d, id) = design();
        let c = Context::new();

        let args = Args::new().signal("a", c.signal(0)).signal("b", c.signal(0));

        assert!(validate_args(d.get(id).unwrap(), &args).is_ok());
    }

    #[test]
    fn recursive_instance_error() {
        let (d, id) = design();

        match validate_instance(&d, &[id], id, "a") {
            Err(Error::RecursiveDefinition { block, instance }) => {
                assert_eq!(block, "adder");
                assert_eq!(instance, "a");
            }
            _ => panic!("Expected a recursive definition error"),
        }
        assert!(validate_instance(&d, &[], id, "a").is_ok());
    }
}
