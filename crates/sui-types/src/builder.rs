//! Programmable transaction builder.
//!
//! [`ProgrammableTransactionBuilder::add_input`] is the only way inputs are
//! appended. It looks the new input up by value and returns the existing slot on a
//! match, so the same pure value used twice becomes one input referenced by two
//! `Argument::Input`s. The chain derives the same input list for the same intent,
//! and the transaction digest depends on it.
//!
//! ```
//! use sui_txkit_types::builder::ProgrammableTransactionBuilder;
//! use sui_txkit_types::transaction::Argument;
//!
//! let mut builder = ProgrammableTransactionBuilder::new();
//! let a = builder.pure(&100u64).unwrap();
//! let b = builder.pure(&100u64).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a, Argument::Input(0));
//! assert_eq!(builder.finish().inputs.len(), 1);
//! ```

use indexmap::IndexSet;
use sui_txkit_bcs::{BcsEncode, BcsError, BcsResult, PureType, PureValue};

use crate::address::{ObjectID, SuiAddress};
use crate::framework::{PACKAGE_MODULE, SUI_FRAMEWORK};
use crate::object::ObjectRef;
use crate::transaction::{
    Argument, CallArg, Command, ObjectArg, ProgrammableMoveCall, ProgrammableTransaction, PureArg,
};
use crate::type_tag::TypeTag;

#[derive(Debug, Default)]
pub struct ProgrammableTransactionBuilder {
    inputs: IndexSet<CallArg>,
    commands: Vec<Command>,
}

fn slot(index: usize, what: &str) -> BcsResult<u16> {
    u16::try_from(index).map_err(|_| BcsError::range(format!("{} index {} exceeds u16", what, index)))
}

impl ProgrammableTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> ProgrammableTransaction {
        ProgrammableTransaction {
            inputs: self.inputs.into_iter().collect(),
            commands: self.commands,
        }
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Add an input, reusing the slot of an equal input already present.
    ///
    /// A new input past the last `u16` slot fails and leaves the builder unchanged.
    pub fn add_input(&mut self, arg: CallArg) -> BcsResult<Argument> {
        if let Some(index) = self.inputs.get_index_of(&arg) {
            return Ok(Argument::Input(slot(index, "input")?));
        }
        let index = slot(self.inputs.len(), "input")?;
        self.inputs.insert(arg);
        Ok(Argument::Input(index))
    }

    /// BCS-encode `value` and add it as a pure input.
    pub fn pure<T: BcsEncode + ?Sized>(&mut self, value: &T) -> BcsResult<Argument> {
        self.add_input(CallArg::pure(value)?)
    }

    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> BcsResult<Argument> {
        self.add_input(CallArg::pure_bytes(bytes))
    }

    /// Add a pure input from a run-time typed value, keeping the type annotation.
    pub fn pure_typed(&mut self, ty: PureType, value: &PureValue) -> BcsResult<Argument> {
        self.add_input(CallArg::Pure(PureArg::typed(ty, value)?))
    }

    pub fn obj(&mut self, obj_arg: ObjectArg) -> BcsResult<Argument> {
        self.add_input(CallArg::Object(obj_arg))
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Append a command and return its `Result` argument.
    pub fn command(&mut self, command: Command) -> BcsResult<Argument> {
        let index = slot(self.commands.len(), "command")?;
        self.commands.push(command);
        Ok(Argument::Result(index))
    }

    /// Move call whose arguments are given as inputs.
    pub fn move_call(
        &mut self,
        package: ObjectID,
        module: impl Into<String>,
        function: impl Into<String>,
        type_arguments: Vec<TypeTag>,
        call_args: Vec<CallArg>,
    ) -> BcsResult<Argument> {
        let arguments = call_args
            .into_iter()
            .map(|arg| self.add_input(arg))
            .collect::<BcsResult<Vec<_>>>()?;
        self.programmable_move_call(package, module, function, type_arguments, arguments)
    }

    /// Move call over arguments that are already in the transaction.
    pub fn programmable_move_call(
        &mut self,
        package: ObjectID,
        module: impl Into<String>,
        function: impl Into<String>,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> BcsResult<Argument> {
        self.command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.into(),
            function: function.into(),
            type_arguments,
            arguments,
        })))
    }

    pub fn transfer_arg(&mut self, recipient: SuiAddress, arg: Argument) -> BcsResult<()> {
        self.transfer_args(recipient, vec![arg])
    }

    pub fn transfer_args(&mut self, recipient: SuiAddress, args: Vec<Argument>) -> BcsResult<()> {
        let rec_arg = self.pure(&recipient)?;
        self.command(Command::TransferObjects(args, rec_arg))?;
        Ok(())
    }

    /// Transfer owned objects to `recipient`.
    pub fn transfer_objects(&mut self, recipient: SuiAddress, objs: Vec<ObjectRef>) -> BcsResult<()> {
        let rec_arg = self.pure(&recipient)?;
        let obj_args = objs
            .into_iter()
            .map(|o| self.obj(ObjectArg::ImmOrOwnedObject(o)))
            .collect::<BcsResult<Vec<_>>>()?;
        self.command(Command::TransferObjects(obj_args, rec_arg))?;
        Ok(())
    }

    /// Send `amount` split off the gas coin, or the whole gas coin when `amount` is `None`.
    pub fn transfer_sui(&mut self, recipient: SuiAddress, amount: Option<u64>) -> BcsResult<()> {
        let rec_arg = self.pure(&recipient)?;
        let coin_arg = match amount {
            Some(amount) => {
                let amt_arg = self.pure(&amount)?;
                self.command(Command::SplitCoins(Argument::GasCoin, vec![amt_arg]))?
            }
            None => Argument::GasCoin,
        };
        self.command(Command::TransferObjects(vec![coin_arg], rec_arg))?;
        Ok(())
    }

    /// Split the gas coin into `amounts` and send each piece to the matching recipient.
    pub fn pay_sui(&mut self, recipients: Vec<SuiAddress>, amounts: Vec<u64>) -> BcsResult<()> {
        if recipients.len() != amounts.len() {
            return Err(BcsError::invalid(format!(
                "pay_sui got {} recipients but {} amounts",
                recipients.len(),
                amounts.len()
            )));
        }
        if recipients.is_empty() {
            return Ok(());
        }
        let amt_args = amounts
            .iter()
            .map(|amount| self.pure(amount))
            .collect::<BcsResult<Vec<_>>>()?;
        let split = self.command(Command::SplitCoins(Argument::GasCoin, amt_args))?;
        let Argument::Result(split_index) = split else {
            return Err(BcsError::invalid("split command did not yield a result"));
        };
        for (i, recipient) in recipients.into_iter().enumerate() {
            let coin = Argument::NestedResult(split_index, slot(i, "split result")?);
            self.transfer_arg(recipient, coin)?;
        }
        Ok(())
    }

    /// Split `coin` into one new coin per amount.
    pub fn split_coins(&mut self, coin: Argument, amounts: &[u64]) -> BcsResult<Argument> {
        let amt_args = amounts
            .iter()
            .map(|amount| self.pure(amount))
            .collect::<BcsResult<Vec<_>>>()?;
        self.command(Command::SplitCoins(coin, amt_args))
    }

    /// Merge owned coins into `target`.
    pub fn merge_coins(&mut self, target: ObjectRef, coins: Vec<ObjectRef>) -> BcsResult<()> {
        let target_arg = self.obj(ObjectArg::ImmOrOwnedObject(target))?;
        let coin_args = coins
            .into_iter()
            .map(|c| self.obj(ObjectArg::ImmOrOwnedObject(c)))
            .collect::<BcsResult<Vec<_>>>()?;
        self.command(Command::MergeCoins(target_arg, coin_args))?;
        Ok(())
    }

    /// Merge all `coins` into the first one and return it.
    pub fn smash_coins(&mut self, coins: Vec<ObjectRef>) -> BcsResult<Argument> {
        let mut coins = coins.into_iter();
        let Some(first) = coins.next() else {
            return Err(BcsError::invalid("smash_coins needs at least one coin"));
        };
        let target = self.obj(ObjectArg::ImmOrOwnedObject(first))?;
        let rest = coins
            .map(|c| self.obj(ObjectArg::ImmOrOwnedObject(c)))
            .collect::<BcsResult<Vec<_>>>()?;
        self.command(Command::MergeCoins(target, rest))?;
        Ok(target)
    }

    /// Publish modules; the result is the package's `UpgradeCap`.
    pub fn publish(&mut self, modules: Vec<Vec<u8>>, dependencies: Vec<ObjectID>) -> BcsResult<Argument> {
        self.command(Command::Publish(modules, dependencies))
    }

    /// Publish and hand the `UpgradeCap` to `sender`.
    pub fn publish_immutable_to(
        &mut self,
        sender: SuiAddress,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectID>,
    ) -> BcsResult<()> {
        let cap = self.publish(modules, dependencies)?;
        self.transfer_arg(sender, cap)
    }

    /// Upgrade `package_id` with an already-authorized upgrade `ticket`.
    pub fn upgrade(
        &mut self,
        package_id: ObjectID,
        ticket: Argument,
        dependencies: Vec<ObjectID>,
        modules: Vec<Vec<u8>>,
    ) -> BcsResult<Argument> {
        self.command(Command::Upgrade(modules, dependencies, package_id, ticket))
    }

    pub fn make_move_vec(&mut self, element_type: Option<TypeTag>, elements: Vec<Argument>) -> BcsResult<Argument> {
        if element_type.is_none() && elements.is_empty() {
            return Err(BcsError::invalid(
                "make_move_vec needs an element type when there are no elements",
            ));
        }
        self.command(Command::MakeMoveVec(element_type, elements))
    }

    /// `0x2::package::authorize_upgrade(cap, policy, digest)`
    pub fn authorize_upgrade(
        &mut self,
        upgrade_cap: ObjectArg,
        policy: u8,
        digest: Vec<u8>,
    ) -> BcsResult<Argument> {
        let cap = self.obj(upgrade_cap)?;
        let policy = self.pure(&policy)?;
        let digest = self.pure(&digest)?;
        self.programmable_move_call(
            SUI_FRAMEWORK,
            PACKAGE_MODULE,
            "authorize_upgrade",
            vec![],
            vec![cap, policy, digest],
        )
    }
}
