//! DISPPARAMS and EXCEPINFO ([MS-OAUT] 2.2.33, 2.2.30)
//!
//! Both structures pass through `IDispatch::Invoke` as ref parameters:
//! their inline parts are written in place with no top-level referent,
//! while their string and array members nest unique pointers.

use ndr::{
    Deferred, NdrMarshal, NdrPointee, NdrReader, NdrUnmarshal, NdrWriter, Result,
};

use crate::bstr::BStr;
use crate::variant::Variant;

/// The argument block of an `Invoke` call.
///
/// `args` travels in reverse positional order per the automation
/// convention; this layer does not reorder it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispParams {
    /// rgvarg: each slot a unique pointer to a VARIANT
    pub args: Vec<Option<Variant>>,
    /// rgdispidNamedArgs
    pub named_arg_dispatch_ids: Vec<i32>,
}

/// Decode intermediary for a conformant array of VARIANT pointers
pub struct VariantSlots(pub Vec<Option<Variant>>);

impl NdrPointee for VariantSlots {
    type Repr = Vec<Deferred<Variant>>;

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr> {
        let count = r.read_size(4)?;
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            handles.push(r.read_pointer::<Variant>()?);
        }
        Ok(handles)
    }

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self> {
        let mut slots = Vec::with_capacity(repr.len());
        for handle in repr {
            slots.push(handle.take(r)?);
        }
        Ok(Self(slots))
    }
}

/// Write a conformant array of VARIANT pointers, bodies deferred
pub fn write_variant_slots(w: &mut NdrWriter, slots: &[Option<Variant>]) -> Result<()> {
    w.write_u32(slots.len() as u32);
    for slot in slots {
        w.write_pointer(slot.as_ref())?;
    }
    Ok(())
}

/// Conformant DISPID array, fully inline
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispIdArray(pub Vec<i32>);

impl NdrMarshal for DispIdArray {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_u32(self.0.len() as u32);
        for id in &self.0 {
            w.write_i32(*id);
        }
        Ok(())
    }
}

impl NdrUnmarshal for DispIdArray {
    fn unmarshal_ndr(r: &mut NdrReader) -> Result<Self> {
        let count = r.read_size(4)?;
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(r.read_i32()?);
        }
        Ok(Self(ids))
    }
}

impl NdrMarshal for DispParams {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        if self.args.is_empty() {
            w.write_u32(0);
        } else {
            let args = self.args.clone();
            w.write_pointer_with(move |w| write_variant_slots(w, &args))?;
        }
        if self.named_arg_dispatch_ids.is_empty() {
            w.write_u32(0);
        } else {
            w.write_pointer(Some(&DispIdArray(self.named_arg_dispatch_ids.clone())))?;
        }
        w.write_u32(self.args.len() as u32); // cArgs
        w.write_u32(self.named_arg_dispatch_ids.len() as u32); // cNamedArgs
        Ok(())
    }
}

/// Decode intermediary for [`DispParams`]
pub struct DispParamsRepr {
    args: Deferred<VariantSlots>,
    named: Deferred<DispIdArray>,
}

impl NdrPointee for DispParams {
    type Repr = DispParamsRepr;

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr> {
        let args = r.read_pointer::<VariantSlots>()?;
        let named = r.read_pointer::<DispIdArray>()?;
        let _c_args = r.read_u32()?;
        let _c_named = r.read_u32()?;
        Ok(DispParamsRepr { args, named })
    }

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self> {
        Ok(Self {
            args: repr.args.take(r)?.map(|s| s.0).unwrap_or_default(),
            named_arg_dispatch_ids: repr.named.take(r)?.map(|a| a.0).unwrap_or_default(),
        })
    }
}

/// Exception detail returned by a failed `Invoke`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExcepInfo {
    pub code: u16,
    pub reserved: u16,
    pub source: Option<BStr>,
    pub description: Option<BStr>,
    pub help_file: Option<BStr>,
    pub help_context: u32,
    pub scode: i32,
}

impl NdrMarshal for ExcepInfo {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_u16(self.code);
        w.write_u16(self.reserved);
        w.write_pointer(self.source.as_ref())?;
        w.write_pointer(self.description.as_ref())?;
        w.write_pointer(self.help_file.as_ref())?;
        w.write_u32(self.help_context);
        // pvReserved and pfnDeferredFillIn are always null on the wire
        w.write_u32(0);
        w.write_u32(0);
        w.write_i32(self.scode);
        Ok(())
    }
}

/// Decode intermediary for [`ExcepInfo`]
pub struct ExcepInfoRepr {
    code: u16,
    reserved: u16,
    source: Deferred<BStr>,
    description: Deferred<BStr>,
    help_file: Deferred<BStr>,
    help_context: u32,
    scode: i32,
}

impl NdrPointee for ExcepInfo {
    type Repr = ExcepInfoRepr;

    fn read_repr(r: &mut NdrReader) -> Result<Self::Repr> {
        let code = r.read_u16()?;
        let reserved = r.read_u16()?;
        let source = r.read_pointer::<BStr>()?;
        let description = r.read_pointer::<BStr>()?;
        let help_file = r.read_pointer::<BStr>()?;
        let help_context = r.read_u32()?;
        let _pv_reserved = r.read_u32()?;
        let _deferred_fill_in = r.read_u32()?;
        let scode = r.read_i32()?;
        Ok(ExcepInfoRepr {
            code,
            reserved,
            source,
            description,
            help_file,
            help_context,
            scode,
        })
    }

    fn take_repr(repr: Self::Repr, r: &mut NdrReader) -> Result<Self> {
        Ok(Self {
            code: repr.code,
            reserved: repr.reserved,
            source: repr.source.take(r)?,
            description: repr.description.take(r)?,
            help_file: repr.help_file.take(r)?,
            help_context: repr.help_context,
            scode: repr.scode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disp_params_round_trip() {
        let params = DispParams {
            args: vec![
                Some(Variant::I4(42)),
                None,
                Some(Variant::BStr(Some(BStr::new("arg")))),
            ],
            named_arg_dispatch_ids: vec![-3, 0],
        };
        let mut w = NdrWriter::new();
        params.marshal_ndr(&mut w).unwrap();
        w.write_deferred().unwrap();
        let mut r = NdrReader::new(w.into_bytes());
        let repr = DispParams::read_repr(&mut r).unwrap();
        r.read_deferred().unwrap();
        let decoded = DispParams::take_repr(repr, &mut r).unwrap();
        assert_eq!(decoded, params);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn empty_disp_params_is_two_null_pointers_and_zero_counts() {
        let mut w = NdrWriter::new();
        DispParams::default().marshal_ndr(&mut w).unwrap();
        w.write_deferred().unwrap();
        assert_eq!(&w.into_bytes()[..], &[0u8; 16]);
    }

    #[test]
    fn excep_info_round_trip() {
        let info = ExcepInfo {
            code: 0,
            reserved: 0,
            source: Some(BStr::new("EventSystem")),
            description: Some(BStr::new("class not registered")),
            help_file: None,
            help_context: 7,
            scode: dcom::hresult::E_FAIL,
        };
        let mut w = NdrWriter::new();
        info.marshal_ndr(&mut w).unwrap();
        w.write_deferred().unwrap();
        let mut r = NdrReader::new(w.into_bytes());
        let repr = ExcepInfo::read_repr(&mut r).unwrap();
        r.read_deferred().unwrap();
        assert_eq!(ExcepInfo::take_repr(repr, &mut r).unwrap(), info);
    }
}
